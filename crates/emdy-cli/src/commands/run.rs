use super::{new_session, print_saved, report_calls};
use crate::cli::FormArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use emdy_setup::core::dry_run::DryRunLibrary;
use emdy_setup::engine::stage::StageOutcome;
use emdy_setup::workflows;
use tracing::info;

pub fn run(args: FormArgs) -> Result<()> {
    let config = build_config(&args)?;
    let library = DryRunLibrary::new();
    let progress = CliProgressHandler::new();
    let mut session = new_session(&library, config, &progress);

    println!("Starting setup...");
    info!("Invoking the setup workflow...");
    let summary = workflows::setup::run(&mut session)?;

    for (stage, outcome) in &summary.stages {
        match outcome {
            StageOutcome::Skipped { reason } => println!("- {:<12} skipped: {}", stage.label(), reason),
            _ => println!("✓ {:<12} done", stage.label()),
        }
    }
    if let Some(saved) = &summary.saved {
        print_saved(saved);
    }
    println!("Total charge is {:+.6} e", summary.total_charge);
    report_calls(&library);
    Ok(())
}
