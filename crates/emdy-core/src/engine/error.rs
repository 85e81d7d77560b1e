use crate::core::library::ForcefieldInfoError;
use std::error::Error as StdError;
use thiserror::Error;

/// A required form field is missing or holds an unusable value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please specify a pdb file")]
    MissingStructure,
    #[error("Please specify a forcefield file")]
    MissingForcefield,
    #[error("Please specify a parameter file")]
    MissingParameters,
    #[error("Please specify a topology file")]
    MissingTopologyOutput,
    #[error("Please specify a coordinate file")]
    MissingCoordinateOutput,
    #[error("Please specify a rule file")]
    MissingRuleFile,
    #[error("Please specify a bond file")]
    MissingDisulfideFile,
    #[error("Please specify a PDB code")]
    MissingPdbCode,
    #[error("Please specify the box length {0}")]
    MissingBoxLength(char),
    #[error("Please specify the box angle {0}")]
    MissingBoxAngle(char),
    #[error("A sphere takes its radius from the padding; enable padding")]
    SpherePaddingRequired,
    #[error("Box lengths are derived from the padding; disable padding and give lengths")]
    UnresolvedBox,
    #[error("The box angles do not describe a valid cell")]
    DegenerateBox,
    #[error("{field} must be at least {min}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
    },
    #[error("{field} must be alphanumeric, got '{value}'")]
    InvalidSegment { field: &'static str, value: String },
    #[error("Nothing to place: enable neutralization or give a cation or anion count")]
    NoIonsRequested,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Library call '{operation}' failed: {source}")]
    Library {
        operation: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Viewer call '{operation}' failed: {source}")]
    Viewer {
        operation: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("No structure is loaded")]
    NothingLoaded,

    #[error("{option} is not supported")]
    Unsupported { option: String },

    #[error("Cannot identify the force field: {0}")]
    ForcefieldInfo(#[from] ForcefieldInfoError),
}

impl SessionError {
    pub(crate) fn library<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        move |e| SessionError::Library {
            operation,
            source: Box::new(e),
        }
    }

    pub(crate) fn viewer<E>(operation: &'static str) -> impl FnOnce(E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        move |e| SessionError::Viewer {
            operation,
            source: Box::new(e),
        }
    }

    pub(crate) fn unsupported(option: impl std::fmt::Display) -> Self {
        SessionError::Unsupported {
            option: option.to_string(),
        }
    }
}
