//! Checks run before any library call. The first failing rule wins, and
//! rules are visited in the order fields appear on the form.

use super::box_policy;
use super::config::{SetupConfig, non_blank};
use super::error::ValidationError;
use super::stage::Stage;
use crate::core::models::preparation::{DisulfideBonds, RenameRules};
use crate::core::models::solvent::BoxShape;

pub const MIN_CUTOFF: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Execute(Stage),
    Save,
    ShowBox,
}

pub fn validate(config: &SetupConfig, action: Action) -> Result<(), ValidationError> {
    match action {
        Action::Load | Action::Execute(Stage::Io) => check_inputs(config),
        Action::Execute(Stage::Preparation) => {
            check_inputs(config)?;
            check_preparation(config)
        }
        Action::Execute(Stage::Solvation) => {
            check_inputs(config)?;
            check_solvation(config)
        }
        Action::Execute(Stage::Ionization) => {
            check_inputs(config)?;
            check_ionization(config)
        }
        Action::Save => {
            check_inputs(config)?;
            check_outputs(config)
        }
        Action::ShowBox => box_policy::resolve_geometry(&config.solvation).map(drop),
    }
}

fn check_inputs(config: &SetupConfig) -> Result<(), ValidationError> {
    let io = &config.io;
    non_blank(io.structure.as_ref()).ok_or(ValidationError::MissingStructure)?;
    non_blank(io.forcefield.as_ref()).ok_or(ValidationError::MissingForcefield)?;
    non_blank(io.parameters.as_ref()).ok_or(ValidationError::MissingParameters)?;
    Ok(())
}

fn check_outputs(config: &SetupConfig) -> Result<(), ValidationError> {
    let io = &config.io;
    non_blank(io.topology_output.as_ref()).ok_or(ValidationError::MissingTopologyOutput)?;
    non_blank(io.coordinate_output.as_ref()).ok_or(ValidationError::MissingCoordinateOutput)?;
    Ok(())
}

fn check_preparation(config: &SetupConfig) -> Result<(), ValidationError> {
    let prep = &config.preparation;
    if let RenameRules::Custom(path) = &prep.rename_rules {
        non_blank(Some(path)).ok_or(ValidationError::MissingRuleFile)?;
    }
    match &prep.disulfide {
        DisulfideBonds::FromFile(path) => {
            non_blank(Some(path)).ok_or(ValidationError::MissingDisulfideFile)?;
        }
        DisulfideBonds::Detect { cutoff } => at_least("disulfide cutoff", *cutoff, MIN_CUTOFF)?,
        DisulfideBonds::None => {}
    }
    Ok(())
}

fn check_solvation(config: &SetupConfig) -> Result<(), ValidationError> {
    let form = &config.solvation;
    check_segment("solvent segment", &form.segment)?;
    if form.padding_in_effect() {
        at_least("padding", form.padding, 0.0)?;
    }
    at_least("cutoff", form.cutoff, MIN_CUTOFF)?;

    match form.shape {
        BoxShape::Sphere if !form.use_padding => Err(ValidationError::SpherePaddingRequired),
        BoxShape::Sphere => Ok(()),
        BoxShape::Triclinic => box_policy::resolve_geometry(form).map(drop),
        _ => box_policy::solvation_extent(form).map(drop),
    }
}

fn check_ionization(config: &SetupConfig) -> Result<(), ValidationError> {
    let ion = &config.ionization;
    check_segment("ion segment", &ion.segment)?;
    at_least("ion-solvent cutoff", ion.ion_solvent_cutoff, MIN_CUTOFF)?;
    at_least("ion-ion cutoff", ion.ion_ion_cutoff, MIN_CUTOFF)?;
    at_least("salt concentration", ion.salt_concentration, 0.0)?;
    if ion.effective_counts() == (0, 0) && !ion.neutralize {
        return Err(ValidationError::NoIonsRequested);
    }
    Ok(())
}

fn check_segment(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ValidationError> {
    // NaN fails too.
    if value >= min {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value, min })
    }
}
