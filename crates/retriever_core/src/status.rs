use std::fmt;

/// Terminal outcome of one run. Exactly one is reported per `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    CompletedWithError(i32),
    Cancelled,
    LaunchFailed(String),
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::CompletedWithError(code) => write!(f, "exited with code {code}"),
            RunStatus::Cancelled => write!(f, "cancelled"),
            RunStatus::LaunchFailed(reason) => write!(f, "launch failed: {reason}"),
        }
    }
}
