use emdy_setup::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders session progress on stderr: a spinner per stage and a counter
/// while output files are written.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::PhaseSkipped { reason } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message(format!("- Skipped: {}", reason));
                }
                Progress::PhaseFailed { reason } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.abandon_with_message(format!("✗ Failed: {}", reason));
                }
                Progress::FilesStart { total } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::counter_style());
                    pb_guard.set_message("Writing files");
                }
                Progress::FileWritten { path } => {
                    pb_guard.inc(1);
                    pb_guard.println(format!("  wrote {}", path.display()));
                }
                Progress::FilesFinish => {
                    let total = pb_guard.length().unwrap_or(0);
                    pb_guard.set_position(total);
                    pb_guard.finish();
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn counter_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<16} [{bar:20.cyan/blue}] {pos}/{len}")
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
