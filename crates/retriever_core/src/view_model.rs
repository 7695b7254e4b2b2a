use crate::{RunKind, RunStatus, SessionState, ValidationError};

/// Message shown next to the status line until the next run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A run was requested while another was still in flight.
    Busy { requested: RunKind },
    Invalid {
        kind: RunKind,
        error: ValidationError,
    },
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    /// Command line echoed before the run's output.
    pub command: Option<String>,
    /// Buffered output, oldest first.
    pub output: Vec<String>,
    /// Sequence number of `output[0]` among all lines seen so far.
    pub first_line_index: u64,
    pub last_status: Option<RunStatus>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}
