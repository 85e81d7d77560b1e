mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;
mod viewer;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use emdy_setup::engine::stage::Stage;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("EMDY setup CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Prepare(args) => commands::stage::run(Stage::Preparation, args),
        Commands::Solvate(args) => commands::stage::run(Stage::Solvation, args),
        Commands::Ionize(args) => commands::stage::run(Stage::Ionization, args),
        Commands::Output(args) => commands::stage::output(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::BoxFields(args) => commands::box_fields::run(args),
        Commands::Charge(args) => commands::stage::charge(args),
        Commands::Download(args) => commands::download::run(args),
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
