use super::{Choice, impl_choice_traits};
use serde::{Deserialize, Serialize};

/// Output format for the model's topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyFormat {
    #[default]
    AmberPrmtop,
    ChamberPrmtop,
    GromacsTop,
    NamdPsf,
}

impl TopologyFormat {
    /// Default file extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TopologyFormat::AmberPrmtop | TopologyFormat::ChamberPrmtop => ".prmtop",
            TopologyFormat::GromacsTop => ".top",
            TopologyFormat::NamdPsf => ".psf",
        }
    }
}

impl Choice for TopologyFormat {
    const KIND: &'static str = "topology format";
    const ALL: &'static [Self] = &[
        TopologyFormat::AmberPrmtop,
        TopologyFormat::ChamberPrmtop,
        TopologyFormat::GromacsTop,
        TopologyFormat::NamdPsf,
    ];

    fn label(&self) -> &'static str {
        match self {
            TopologyFormat::AmberPrmtop => "AMBER prmtop",
            TopologyFormat::ChamberPrmtop => "CHAMBER prmtop",
            TopologyFormat::GromacsTop => "GROMACS top",
            TopologyFormat::NamdPsf => "NAMD psf",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            TopologyFormat::AmberPrmtop => "amber-prmtop",
            TopologyFormat::ChamberPrmtop => "chamber-prmtop",
            TopologyFormat::GromacsTop => "gromacs-top",
            TopologyFormat::NamdPsf => "namd-psf",
        }
    }
}

impl_choice_traits!(TopologyFormat);

/// Output format for the model's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateFormat {
    #[default]
    AmberInpcrd,
    GromacsG96,
    GromacsGro,
    NamdBin,
    Pdb,
}

impl CoordinateFormat {
    /// Default file extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            CoordinateFormat::AmberInpcrd => ".inpcrd",
            CoordinateFormat::GromacsG96 => ".g96",
            CoordinateFormat::GromacsGro => ".gro",
            CoordinateFormat::NamdBin => ".bin",
            CoordinateFormat::Pdb => ".pdb",
        }
    }
}

impl Choice for CoordinateFormat {
    const KIND: &'static str = "coordinate format";
    const ALL: &'static [Self] = &[
        CoordinateFormat::AmberInpcrd,
        CoordinateFormat::GromacsG96,
        CoordinateFormat::GromacsGro,
        CoordinateFormat::NamdBin,
        CoordinateFormat::Pdb,
    ];

    fn label(&self) -> &'static str {
        match self {
            CoordinateFormat::AmberInpcrd => "AMBER inpcrd",
            CoordinateFormat::GromacsG96 => "GROMACS g96",
            CoordinateFormat::GromacsGro => "GROMACS gro",
            CoordinateFormat::NamdBin => "NAMD bin",
            CoordinateFormat::Pdb => "pdb",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            CoordinateFormat::AmberInpcrd => "amber-inpcrd",
            CoordinateFormat::GromacsG96 => "gromacs-g96",
            CoordinateFormat::GromacsGro => "gromacs-gro",
            CoordinateFormat::NamdBin => "namd-bin",
            CoordinateFormat::Pdb => "pdb",
        }
    }
}

impl_choice_traits!(CoordinateFormat);
