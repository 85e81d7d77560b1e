use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Console level for a `-v` count; `--quiet` silences everything.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .with_filter(level_filter(verbosity, quiet));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::{debug, info};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn file_layer_records_events_without_colour() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("setup.log");
        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        );

        tracing::subscriber::with_default(subscriber, || {
            debug!(stage = "Solvation", "Stage completed.");
            info!("Inputs loaded");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Stage completed."));
        assert!(content.contains("stage=\"Solvation\""));
        assert!(content.contains("DEBUG"));
        assert!(!content.contains("\u{1b}["));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, true, Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
