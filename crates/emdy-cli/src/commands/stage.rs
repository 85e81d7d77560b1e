use super::{new_session, print_saved, report_calls};
use crate::cli::{FormArgs, StageArgs};
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use emdy_setup::core::dry_run::DryRunLibrary;
use emdy_setup::engine::stage::{Stage, StageOutcome};
use tracing::info;

/// Loads the inputs and runs one stage, optionally writing the output files.
pub fn run(stage: Stage, args: StageArgs) -> Result<()> {
    let config = build_config(&args.form)?;
    let library = DryRunLibrary::new();
    let progress = CliProgressHandler::new();
    let mut session = new_session(&library, config, &progress);

    info!("Running the {} stage.", stage);
    match session.execute(stage)? {
        StageOutcome::Completed { object } => {
            println!("✓ {} completed; the model is shown as '{}'.", stage, object)
        }
        StageOutcome::Skipped { reason } => println!("- {} skipped: {}", stage, reason),
        StageOutcome::Loaded => println!("✓ Inputs loaded."),
    }

    if args.save {
        print_saved(&session.save()?);
    }
    report_calls(&library);
    Ok(())
}

pub fn output(args: FormArgs) -> Result<()> {
    let config = build_config(&args)?;
    let library = DryRunLibrary::new();
    let progress = CliProgressHandler::new();
    let mut session = new_session(&library, config, &progress);

    print_saved(&session.save()?);
    report_calls(&library);
    Ok(())
}

pub fn charge(args: FormArgs) -> Result<()> {
    let config = build_config(&args)?;
    let library = DryRunLibrary::new();
    let progress = CliProgressHandler::new();
    let mut session = new_session(&library, config, &progress);

    session.load()?;
    println!("Total charge is {:+.6} e", session.total_charge()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use emdy_setup::core::models::formats::TopologyFormat;
    use emdy_setup::engine::error::{SessionError, ValidationError};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn inputs(dir: &TempDir) -> FormArgs {
        let write = |name: &str, content: &str| -> PathBuf {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        };
        FormArgs {
            structure: Some(write("protein.pdb", "END\n")),
            forcefield: Some(write("top.rtf", "* Top all36\n* 36 1\n*\n")),
            parameters: Some(write("par.prm", "* Par all36\n*\n")),
            ..FormArgs::default()
        }
    }

    #[test]
    fn single_stage_runs_against_real_input_files() {
        let dir = TempDir::new().unwrap();
        let args = StageArgs {
            form: inputs(&dir),
            save: false,
        };
        run(Stage::Preparation, args).unwrap();
    }

    #[test]
    fn stage_with_save_needs_output_paths() {
        let dir = TempDir::new().unwrap();
        let args = StageArgs {
            form: inputs(&dir),
            save: true,
        };
        let err = run(Stage::Solvation, args).unwrap_err();
        assert!(matches!(
            err,
            CliError::Session(SessionError::Validation(
                ValidationError::MissingTopologyOutput
            ))
        ));
    }

    #[test]
    fn missing_structure_is_reported_first() {
        let err = charge(FormArgs::default()).unwrap_err();
        assert_eq!(err.to_string(), "Please specify a pdb file");
    }

    #[test]
    fn chamber_output_accepts_a_charmm_topology_header() {
        let dir = TempDir::new().unwrap();
        let mut form = inputs(&dir);
        let rtf = dir.path().join("top_all36_prot.rtf");
        fs::write(
            &rtf,
            concat!(
                "*>>>>>>>>CHARMM36 All-Hydrogen Topology File for Proteins <<<<<<\n",
                "*>>>>> Includes phi, psi cross term map (CMAP) correction <<<<<<\n",
                "*\n",
                "36  1\n",
                "\n",
                "MASS  -1  H          1.00800\n",
            ),
        )
        .unwrap();
        form.forcefield = Some(rtf);
        form.topology_format = Some(TopologyFormat::ChamberPrmtop);
        form.topology_output = Some(dir.path().join("system"));
        form.coordinate_output = Some(dir.path().join("system.inpcrd"));
        output(form).unwrap();
    }

    #[test]
    fn output_writes_to_the_requested_paths() {
        let dir = TempDir::new().unwrap();
        let mut form = inputs(&dir);
        form.topology_output = Some(dir.path().join("system.prmtop"));
        form.coordinate_output = Some(dir.path().join("system.inpcrd"));
        output(form).unwrap();
    }
}
