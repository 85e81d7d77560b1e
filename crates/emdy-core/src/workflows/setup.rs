use crate::core::library::SetupLibrary;
use crate::core::viewer::Viewer;
use crate::engine::error::SessionError;
use crate::engine::session::Session;
use crate::engine::stage::{SavedFiles, Stage, StageOutcome};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Stages that ran, with what each produced.
    pub stages: Vec<(Stage, StageOutcome)>,
    pub saved: Option<SavedFiles>,
    pub total_charge: f64,
}

/// Runs the whole pipeline: load, build, then solvation, ionization and
/// output as enabled in the session's pipeline switches. Stops at the first
/// failure, leaving the session with the last good model.
#[instrument(skip_all, name = "setup_workflow")]
pub fn run<L, V>(session: &mut Session<'_, L, V>) -> Result<RunSummary, SessionError>
where
    L: SetupLibrary,
    V: Viewer,
{
    let pipeline = session.config().pipeline;
    session.load()?;

    let mut stages = vec![(Stage::Preparation, session.execute(Stage::Preparation)?)];
    if pipeline.solvate {
        stages.push((Stage::Solvation, session.execute(Stage::Solvation)?));
    }
    if pipeline.ionize {
        stages.push((Stage::Ionization, session.execute(Stage::Ionization)?));
    }

    let saved = if pipeline.write_output {
        Some(session.save()?)
    } else {
        None
    };
    let total_charge = session.total_charge()?;

    info!(
        stages = stages.len(),
        total_charge,
        "Setup complete."
    );
    Ok(RunSummary {
        stages,
        saved,
        total_charge,
    })
}
