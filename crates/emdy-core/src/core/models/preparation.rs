use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cutoff (Å) for detecting disulfide bonds from Sγ–Sγ distances.
pub const DEFAULT_DISULFIDE_CUTOFF: f64 = 3.0;

/// Residue/atom renaming applied while building the topology.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenameRules {
    #[default]
    Default,
    Custom(PathBuf),
    None,
}

/// Components of the input structure dropped before the topology is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreOptions {
    pub hydrogens: bool,
    pub ligands: bool,
    pub water: bool,
    pub ions: bool,
}

impl Default for IgnoreOptions {
    fn default() -> Self {
        Self {
            hydrogens: true,
            ligands: false,
            water: false,
            ions: false,
        }
    }
}

/// How disulfide bonds are established.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisulfideBonds {
    #[default]
    None,
    Detect { cutoff: f64 },
    FromFile(PathBuf),
}

/// Everything the topology builder needs beyond the model and force field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparationOptions {
    pub rename_rules: RenameRules,
    pub ignore: IgnoreOptions,
    pub disulfide: DisulfideBonds,
}
