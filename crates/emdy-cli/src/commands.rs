pub mod box_fields;
pub mod check;
pub mod download;
pub mod run;
pub mod stage;

use crate::utils::progress::CliProgressHandler;
use crate::viewer::LogViewer;
use emdy_setup::core::dry_run::DryRunLibrary;
use emdy_setup::engine::config::SetupConfig;
use emdy_setup::engine::progress::ProgressReporter;
use emdy_setup::engine::session::Session;
use emdy_setup::engine::stage::SavedFiles;
use tracing::{debug, info};

pub type CliSession<'a> = Session<'a, DryRunLibrary, LogViewer>;

pub fn new_session<'a>(
    library: &'a DryRunLibrary,
    config: SetupConfig,
    progress: &CliProgressHandler,
) -> CliSession<'a> {
    Session::new(library, LogViewer::new(), config)
        .with_reporter(ProgressReporter::with_callback(progress.get_callback()))
}

pub fn print_saved(saved: &SavedFiles) {
    println!("✓ 2 files were generated:");
    println!("  topology:    {}", saved.topology.display());
    println!("  coordinates: {}", saved.coordinates.display());
}

/// Logs what the dry-run library was asked to do.
pub fn report_calls(library: &DryRunLibrary) {
    let calls = library.calls();
    for call in &calls {
        debug!("library call: {:?}", call);
    }
    info!("{} library call(s) recorded.", calls.len());
}
