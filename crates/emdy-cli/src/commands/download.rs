use super::{new_session, report_calls};
use crate::cli::DownloadArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use emdy_setup::core::dry_run::DryRunLibrary;
use tracing::info;

pub fn run(args: DownloadArgs) -> Result<()> {
    let config = build_config(&args.form)?;
    let library = DryRunLibrary::new();
    let progress = CliProgressHandler::new();
    let mut session = new_session(&library, config, &progress);

    info!("Fetching PDB entry {} into {:?}", args.code, args.dir);
    let path = session.download_structure(&args.code, &args.dir)?;
    println!("✓ Structure path set to {}", path.display());
    report_calls(&library);
    Ok(())
}
