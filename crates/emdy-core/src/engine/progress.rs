use std::path::PathBuf;

/// Events a session emits while it works, in the order they happen.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,
    PhaseSkipped { reason: String },
    /// The running phase or file batch stopped with an error.
    PhaseFailed { reason: String },

    FilesStart { total: u64 },
    FileWritten { path: PathBuf },
    FilesFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    #[inline]
    pub fn message(&self, text: impl Into<String>) {
        self.report(Progress::Message(text.into()));
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
