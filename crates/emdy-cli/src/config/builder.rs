use super::file::{FileConfig, overlay};
use crate::cli::FormArgs;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use emdy_setup::engine::box_policy;
use emdy_setup::engine::config::SetupConfig;
use std::path::PathBuf;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the per-user config file, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "emdy", "emdy-setup").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn build_config(args: &FormArgs) -> Result<SetupConfig> {
    let file_path = args
        .config
        .clone()
        .or_else(|| user_config_path().filter(|path| path.is_file()));
    build_config_from(args, file_path)
}

fn build_config_from(args: &FormArgs, file_path: Option<PathBuf>) -> Result<SetupConfig> {
    let mut file_config = match &file_path {
        Some(path) => {
            info!("Reading configuration from {:?}", path);
            FileConfig::from_file(path)?
        }
        None => {
            debug!("No configuration file; using built-in defaults.");
            FileConfig::default()
        }
    };
    file_config.apply_set_values(&args.set_values)?;

    let mut config = SetupConfig::default();
    file_config.apply_to(&mut config);
    apply_cli_flags(args, &mut config)?;
    config.io.complete_output_extensions();

    let solvation = &mut config.solvation;
    box_policy::field_states(solvation.shape, solvation.use_padding).apply(solvation);
    Ok(config)
}

fn apply_cli_flags(args: &FormArgs, config: &mut SetupConfig) -> Result<()> {
    let io = &mut config.io;
    overlay(&mut io.structure, args.structure.clone().map(Some));
    overlay(&mut io.forcefield, args.forcefield.clone().map(Some));
    overlay(&mut io.parameters, args.parameters.clone().map(Some));
    overlay(&mut io.topology_output, args.topology_output.clone().map(Some));
    overlay(&mut io.coordinate_output, args.coordinate_output.clone().map(Some));
    overlay(&mut io.topology_format, args.topology_format);
    overlay(&mut io.coordinate_format, args.coordinate_format);

    let solvation = &mut config.solvation;
    overlay(&mut solvation.solvent, args.solvent);
    overlay(&mut solvation.shape, args.shape);
    overlay(&mut solvation.cutoff, args.cutoff);
    if let Some(padding) = args.padding {
        solvation.use_padding = true;
        solvation.padding = padding;
    }
    if args.no_padding {
        solvation.use_padding = false;
    }
    if !args.lengths.is_empty() {
        let lengths = <[f64; 3]>::try_from(args.lengths.as_slice()).map_err(|_| {
            CliError::Argument(format!(
                "--lengths expects three values, got {}",
                args.lengths.len()
            ))
        })?;
        solvation.lengths = lengths.map(Some);
    }

    let ionization = &mut config.ionization;
    overlay(&mut ionization.cation, args.cation);
    overlay(&mut ionization.anion, args.anion);
    overlay(&mut ionization.cation_count, args.cation_count);
    overlay(&mut ionization.anion_count, args.anion_count);
    overlay(&mut ionization.salt_concentration, args.salt);
    overlay(&mut ionization.placement, args.placement);
    if args.no_neutralize {
        ionization.neutralize = false;
    }
    Ok(())
}
