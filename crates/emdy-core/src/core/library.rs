//! The boundary to the molecular-modeling library that does the real work.
//!
//! Nothing in this crate looks inside a model, a force-field topology or a
//! parameter set: they are associated types of [`SetupLibrary`] and are only
//! threaded from one call to the next.

use super::models::preparation::PreparationOptions;
use super::models::solvent::SolventModel;
use nalgebra::Vector3;
use std::error::Error;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How far the solvent box extends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolvationExtent {
    /// Distance (Å) between the solute and every face of the box, or the
    /// sphere radius beyond the solute.
    Padding(f64),
    /// Explicit cell edge lengths (Å).
    Lengths([f64; 3]),
}

/// Parameters shared by every solvation routine.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvationRequest {
    pub solvent: SolventModel,
    pub segment: String,
    pub extent: SolvationExtent,
    /// Solvent molecules closer than this to the solute (Å) are removed.
    pub cutoff: f64,
    pub center: Vector3<f64>,
    pub minimize_solvent: bool,
}

/// Parameters shared by every ionization routine. Ion species are already
/// resolved to residue codes.
#[derive(Debug, Clone, PartialEq)]
pub struct IonizationRequest {
    pub cation: &'static str,
    pub cation_count: u32,
    pub anion: &'static str,
    pub anion_count: u32,
    /// Target salt concentration in mol/L.
    pub salt_concentration: f64,
    pub ion_solvent_cutoff: f64,
    pub ion_ion_cutoff: f64,
    /// Volume (Å³) of the solvent box when it is known from explicit lengths.
    pub volume: Option<f64>,
    pub segment: String,
}

/// Force-field identification written into CHAMBER topologies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcefieldInfo {
    pub version: i64,
    pub title: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForcefieldInfoError {
    #[error("Force-field topology has no title lines")]
    NoTitles,
    #[error("Cannot read a force-field version from title line '{0}'")]
    BadVersion(String),
}

impl ForcefieldInfo {
    /// Derives the info from a CHARMM topology header: the version is the first
    /// token of the last title line, the title is the first line.
    pub fn from_titles<S: AsRef<str>>(titles: &[S]) -> Result<Self, ForcefieldInfoError> {
        let first = titles.first().ok_or(ForcefieldInfoError::NoTitles)?;
        let last = titles.last().ok_or(ForcefieldInfoError::NoTitles)?.as_ref();
        let version = last
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| ForcefieldInfoError::BadVersion(last.to_string()))?;
        Ok(Self {
            version,
            title: first.as_ref().to_string(),
        })
    }
}

/// Which flavour of AMBER parameter/topology file to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrmtopFlavor {
    Amber,
    Chamber(ForcefieldInfo),
}

/// Operations the setup library provides.
///
/// Transforming calls borrow the current model and return a new one, so a
/// failing call never disturbs the model the caller holds.
pub trait SetupLibrary {
    type Model;
    type Topology;
    type Parameters;
    type Error: Error + Send + Sync + 'static;

    fn read_structure(&self, path: &Path) -> Result<Self::Model, Self::Error>;
    fn read_topology(&self, path: &Path) -> Result<Self::Topology, Self::Error>;
    fn read_parameters(&self, path: &Path) -> Result<Self::Parameters, Self::Error>;

    /// Fetches a PDB entry by its four-character code into `directory` and
    /// returns the path of the downloaded file.
    fn download_structure(&self, code: &str, directory: &Path) -> Result<PathBuf, Self::Error>;

    fn build_topology(
        &self,
        model: &Self::Model,
        topology: &Self::Topology,
        options: &PreparationOptions,
    ) -> Result<Self::Model, Self::Error>;
    fn complete_coordinates(
        &self,
        model: &Self::Model,
        parameters: &Self::Parameters,
    ) -> Result<Self::Model, Self::Error>;

    fn solvate_cuboid(
        &self,
        model: &Self::Model,
        request: &SolvationRequest,
    ) -> Result<Self::Model, Self::Error>;
    fn solvate_truncated_octahedron(
        &self,
        model: &Self::Model,
        request: &SolvationRequest,
    ) -> Result<Self::Model, Self::Error>;
    fn solvate_hexagonal_prism(
        &self,
        model: &Self::Model,
        request: &SolvationRequest,
    ) -> Result<Self::Model, Self::Error>;
    fn solvate_rhombic_dodecahedron(
        &self,
        model: &Self::Model,
        request: &SolvationRequest,
    ) -> Result<Self::Model, Self::Error>;

    fn ionize_randomly(
        &self,
        model: &Self::Model,
        request: &IonizationRequest,
    ) -> Result<Self::Model, Self::Error>;
    fn ionize_by_potential(
        &self,
        model: &Self::Model,
        request: &IonizationRequest,
    ) -> Result<Self::Model, Self::Error>;

    /// Net charge of the model in elementary charges.
    fn total_charge(&self, model: &Self::Model) -> f64;
    /// Title lines of the force-field topology header.
    fn topology_titles(&self, topology: &Self::Topology) -> Vec<String>;
    /// PDB text of the model, as handed to the viewer.
    fn render_pdb(&self, model: &Self::Model) -> Result<String, Self::Error>;

    fn write_psf(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
    fn write_prmtop(
        &self,
        model: &Self::Model,
        parameters: &Self::Parameters,
        flavor: &PrmtopFlavor,
        path: &Path,
    ) -> Result<(), Self::Error>;
    fn write_pdb(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
    fn write_namd_bin(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
    fn write_amber_inpcrd(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
    fn write_g96(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
    fn write_gro(&self, model: &Self::Model, path: &Path) -> Result<(), Self::Error>;
}
