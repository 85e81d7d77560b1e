use crate::cli::{CheckAction, CheckArgs};
use crate::config::build_config;
use crate::error::Result;
use emdy_setup::engine::error::{SessionError, ValidationError};
use emdy_setup::engine::stage::Stage;
use emdy_setup::engine::validation::{Action, validate};

impl From<CheckAction> for Action {
    fn from(action: CheckAction) -> Self {
        match action {
            CheckAction::Load => Action::Load,
            CheckAction::Prepare => Action::Execute(Stage::Preparation),
            CheckAction::Solvate => Action::Execute(Stage::Solvation),
            CheckAction::Ionize => Action::Execute(Stage::Ionization),
            CheckAction::Output => Action::Save,
            CheckAction::ShowBox => Action::ShowBox,
        }
    }
}

/// Validates the merged form for one action. Nothing is read or written.
pub fn run(args: CheckArgs) -> Result<()> {
    let config = build_config(&args.form)?;
    match validate(&config, args.action.into()) {
        Ok(()) => println!("✓ The form is complete for {:?}.", args.action),
        Err(ValidationError::NoIonsRequested) => println!(
            "- Ionization would be skipped: {}",
            ValidationError::NoIonsRequested
        ),
        Err(e) => return Err(SessionError::from(e).into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FormArgs;
    use crate::error::CliError;
    use std::path::PathBuf;

    fn args(action: CheckAction, form: FormArgs) -> CheckArgs {
        CheckArgs { action, form }
    }

    #[test]
    fn load_check_names_the_missing_field() {
        let form = FormArgs {
            structure: Some(PathBuf::from("x.pdb")),
            ..FormArgs::default()
        };
        let err = run(args(CheckAction::Load, form)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Session(SessionError::Validation(ValidationError::MissingForcefield))
        ));
    }

    #[test]
    fn ionization_without_ions_is_not_an_error() {
        let form = FormArgs {
            structure: Some(PathBuf::from("x.pdb")),
            forcefield: Some(PathBuf::from("x.top")),
            parameters: Some(PathBuf::from("x.prm")),
            no_neutralize: true,
            ..FormArgs::default()
        };
        run(args(CheckAction::Ionize, form)).unwrap();
    }

    #[test]
    fn box_check_needs_explicit_lengths() {
        let form = FormArgs {
            no_padding: true,
            lengths: vec![20.0, 20.0, 20.0],
            ..FormArgs::default()
        };
        run(args(CheckAction::ShowBox, form)).unwrap();
        assert!(run(args(CheckAction::ShowBox, FormArgs::default())).is_err());
    }
}
