use crate::core::viewer::objects;
use std::fmt;
use std::path::PathBuf;

/// The page a stage is dispatched from, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Io,
    Preparation,
    Solvation,
    Ionization,
}

impl Stage {
    /// Viewer object that receives the model after the stage, if it changes it.
    pub fn object_name(&self) -> Option<&'static str> {
        match self {
            Stage::Io => None,
            Stage::Preparation => Some(objects::MODIFIED),
            Stage::Solvation => Some(objects::SOLVATED),
            Stage::Ionization => Some(objects::IONIZED),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Io => "I/O",
            Stage::Preparation => "Preparation",
            Stage::Solvation => "Solvation",
            Stage::Ionization => "Ionization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// Inputs are loaded; nothing else was asked for.
    Loaded,
    /// The model was replaced and is displayed under `object`.
    Completed { object: &'static str },
    /// Nothing to do; the model and the library were left untouched.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub topology: PathBuf,
    pub coordinates: PathBuf,
}
