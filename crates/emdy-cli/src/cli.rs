use clap::{Args, Parser, Subcommand, ValueEnum};
use emdy_setup::core::models::formats::{CoordinateFormat, TopologyFormat};
use emdy_setup::core::models::ions::{Anion, Cation, IonPlacement};
use emdy_setup::core::models::solvent::{BoxShape, SolventModel};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Hui Liu",
    version,
    about = "EMDY setup CLI - prepare, solvate and ionize a biomolecular structure and write MD input files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the topology and complete missing coordinates.
    Prepare(StageArgs),
    /// Surround the loaded structure with solvent.
    Solvate(StageArgs),
    /// Add ions to neutralize the structure or reach a salt concentration.
    Ionize(StageArgs),
    /// Write the topology and coordinate files for the loaded structure.
    Output(FormArgs),
    /// Run the whole pipeline: prepare, solvate, ionize and write the output files.
    Run(FormArgs),
    /// Validate the form for an action without touching any file.
    Check(CheckArgs),
    /// Show which solvation-box fields the selected shape uses.
    #[command(name = "box")]
    BoxFields(BoxArgs),
    /// Load the structure and print its total charge.
    Charge(FormArgs),
    /// Download a PDB entry and use it as the input structure.
    Download(DownloadArgs),
}

/// Every value that can be set on the command line. Unset values fall back to
/// `--set`, then to the config file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Path to a configuration file in TOML format.
    /// Defaults to config.toml in the per-user configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solvation.padding=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    // --- Input / Output ---
    /// Input structure in PDB format.
    #[arg(short = 'i', long, value_name = "PATH")]
    pub structure: Option<PathBuf>,

    /// CHARMM topology (force field) file.
    #[arg(short, long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    /// CHARMM parameter file.
    #[arg(short, long, value_name = "PATH")]
    pub parameters: Option<PathBuf>,

    /// Topology file to write.
    #[arg(long, value_name = "PATH")]
    pub topology_output: Option<PathBuf>,

    /// Coordinate file to write.
    #[arg(long, value_name = "PATH")]
    pub coordinate_output: Option<PathBuf>,

    /// Topology format (e.g., 'amber-prmtop', 'namd-psf').
    #[arg(long, value_name = "FORMAT")]
    pub topology_format: Option<TopologyFormat>,

    /// Coordinate format (e.g., 'amber-inpcrd', 'pdb', 'gromacs-gro').
    #[arg(long, value_name = "FORMAT")]
    pub coordinate_format: Option<CoordinateFormat>,

    // --- Solvation ---
    /// Solvent model (e.g., 'tip3p', 'spc-e').
    #[arg(long, value_name = "MODEL")]
    pub solvent: Option<SolventModel>,

    /// Shape of the solvent box (e.g., 'cuboid', 'truncated-octahedron').
    #[arg(long, value_name = "SHAPE")]
    pub shape: Option<BoxShape>,

    /// Padding between the solute and the box faces, in Å.
    #[arg(long, value_name = "ANGSTROM", conflicts_with = "no_padding")]
    pub padding: Option<f64>,

    /// Size the box from explicit edge lengths instead of the padding.
    #[arg(long)]
    pub no_padding: bool,

    /// Box edge lengths a,b,c in Å.
    #[arg(long, value_name = "A,B,C", value_delimiter = ',')]
    pub lengths: Vec<f64>,

    /// Solvent molecules closer than this to the solute are removed, in Å.
    #[arg(long, value_name = "ANGSTROM")]
    pub cutoff: Option<f64>,

    // --- Ionization ---
    /// Cation species (e.g., 'Na+', 'k').
    #[arg(long, value_name = "ION")]
    pub cation: Option<Cation>,

    /// Anion species.
    #[arg(long, value_name = "ION")]
    pub anion: Option<Anion>,

    /// Number of cations to add. Only used with --no-neutralize.
    #[arg(long, value_name = "INT")]
    pub cation_count: Option<u32>,

    /// Number of anions to add. Only used with --no-neutralize.
    #[arg(long, value_name = "INT")]
    pub anion_count: Option<u32>,

    /// Place the given ion counts instead of neutralizing.
    #[arg(long)]
    pub no_neutralize: bool,

    /// Target salt concentration in mol/L.
    #[arg(long, value_name = "MOL_PER_L")]
    pub salt: Option<f64>,

    /// How ions are placed (e.g., 'random', 'electrostatic-potential').
    #[arg(long, value_name = "METHOD")]
    pub placement: Option<IonPlacement>,
}

/// Arguments for the single-stage subcommands.
#[derive(Args, Debug, Clone)]
pub struct StageArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Write the output files after the stage.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the `box` subcommand.
#[derive(Args, Debug, Clone)]
pub struct BoxArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Draw the box (or sphere) in the viewer, along with the input structure.
    #[arg(long)]
    pub draw: bool,

    /// Also draw the coordinate axes. Implies --draw.
    #[arg(long)]
    pub axes: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAction {
    Load,
    Prepare,
    Solvate,
    Ionize,
    Output,
    #[value(name = "box")]
    ShowBox,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// The action to validate the form for.
    #[arg(value_enum)]
    pub action: CheckAction,

    #[command(flatten)]
    pub form: FormArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Four-character PDB code, e.g. 1UBQ.
    #[arg(required = true)]
    pub code: String,

    /// Directory to download into.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub form: FormArgs,
}
