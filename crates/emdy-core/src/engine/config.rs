//! Form state: every value a user can set before dispatching a stage.
//!
//! Defaults reproduce what a fresh setup session starts with. Paths are
//! optional; an unset or blank path is treated as an empty form field.

use crate::core::models::formats::{CoordinateFormat, TopologyFormat};
use crate::core::models::ions::{Anion, Cation, IonPlacement};
use crate::core::models::preparation::{
    DisulfideBonds, IgnoreOptions, PreparationOptions, RenameRules,
};
use crate::core::models::solvent::{BoxShape, SolventModel};
use std::path::{Path, PathBuf};

pub const DEFAULT_PADDING: f64 = 10.0;
pub const DEFAULT_OVERLAP_CUTOFF: f64 = 2.4;
pub const DEFAULT_ION_CUTOFF: f64 = 5.0;
pub const DEFAULT_SOLVENT_SEGMENT: &str = "WAT";
pub const DEFAULT_ION_SEGMENT: &str = "ION";

/// Returns the path if it is set and not blank.
pub fn non_blank(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path)
        .filter(|p| !p.as_os_str().to_string_lossy().trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IoConfig {
    pub structure: Option<PathBuf>,
    pub forcefield: Option<PathBuf>,
    pub parameters: Option<PathBuf>,
    pub topology_output: Option<PathBuf>,
    pub coordinate_output: Option<PathBuf>,
    pub topology_format: TopologyFormat,
    pub coordinate_format: CoordinateFormat,
}

impl IoConfig {
    /// Gives output paths without an extension the default extension of the
    /// selected format.
    pub fn complete_output_extensions(&mut self) {
        add_default_extension(self.topology_output.as_mut(), self.topology_format.extension());
        add_default_extension(
            self.coordinate_output.as_mut(),
            self.coordinate_format.extension(),
        );
    }
}

fn add_default_extension(path: Option<&mut PathBuf>, extension: &str) {
    let Some(path) = path else {
        return;
    };
    if non_blank(Some(&*path)).is_none() || path.extension().is_some() {
        return;
    }
    path.set_extension(extension.trim_start_matches('.'));
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparationConfig {
    pub rename_rules: RenameRules,
    pub ignore: IgnoreOptions,
    pub disulfide: DisulfideBonds,
}

impl PreparationConfig {
    pub fn options(&self) -> PreparationOptions {
        PreparationOptions {
            rename_rules: self.rename_rules.clone(),
            ignore: self.ignore,
            disulfide: self.disulfide.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvationConfig {
    pub solvent: SolventModel,
    pub segment: String,
    pub shape: BoxShape,
    pub use_padding: bool,
    pub padding: f64,
    pub center: [f64; 3],
    pub lengths: [Option<f64>; 3],
    pub angles: [Option<f64>; 3],
    pub cutoff: f64,
    pub minimize_solvent: bool,
}

impl Default for SolvationConfig {
    fn default() -> Self {
        Self {
            solvent: SolventModel::default(),
            segment: DEFAULT_SOLVENT_SEGMENT.to_string(),
            shape: BoxShape::default(),
            use_padding: true,
            padding: DEFAULT_PADDING,
            center: [0.0; 3],
            lengths: [None; 3],
            angles: [Some(90.0); 3],
            cutoff: DEFAULT_OVERLAP_CUTOFF,
            minimize_solvent: false,
        }
    }
}

impl SolvationConfig {
    /// Padding is never in effect for a triclinic cell, whatever the flag says.
    pub fn padding_in_effect(&self) -> bool {
        self.use_padding && self.shape != BoxShape::Triclinic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IonizationConfig {
    pub cation: Cation,
    pub anion: Anion,
    pub cation_count: u32,
    pub anion_count: u32,
    pub neutralize: bool,
    /// Target salt concentration in mol/L.
    pub salt_concentration: f64,
    pub ion_ion_cutoff: f64,
    pub ion_solvent_cutoff: f64,
    pub segment: String,
    pub placement: IonPlacement,
}

impl Default for IonizationConfig {
    fn default() -> Self {
        Self {
            cation: Cation::default(),
            anion: Anion::default(),
            cation_count: 0,
            anion_count: 0,
            neutralize: true,
            salt_concentration: 0.0,
            ion_ion_cutoff: DEFAULT_ION_CUTOFF,
            ion_solvent_cutoff: DEFAULT_ION_CUTOFF,
            segment: DEFAULT_ION_SEGMENT.to_string(),
            placement: IonPlacement::default(),
        }
    }
}

impl IonizationConfig {
    /// Cation and anion counts actually requested. Neutralization lets the
    /// library pick the counts, so explicit values are ignored.
    pub fn effective_counts(&self) -> (u32, u32) {
        if self.neutralize {
            (0, 0)
        } else {
            (self.cation_count, self.anion_count)
        }
    }
}

/// Which optional stages a full run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub solvate: bool,
    pub ionize: bool,
    pub write_output: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            solvate: true,
            ionize: true,
            write_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetupConfig {
    pub io: IoConfig,
    pub preparation: PreparationConfig,
    pub solvation: SolvationConfig,
    pub ionization: IonizationConfig,
    pub pipeline: PipelineConfig,
}
