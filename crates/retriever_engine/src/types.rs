use retriever_core::RunStatus;
use thiserror::Error;

pub type RunId = u64;

/// Lifecycle of the runner's single process slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Launching,
    Running,
    /// The terminal status has been reported to the consumer.
    Finished,
}

impl RunPhase {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            RunPhase::Idle => 0,
            RunPhase::Launching => 1,
            RunPhase::Running => 2,
            RunPhase::Finished => 3,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => RunPhase::Launching,
            2 => RunPhase::Running,
            3 => RunPhase::Finished,
            _ => RunPhase::Idle,
        }
    }

    /// Whether a new run may take the slot.
    pub fn accepts_execute(self) -> bool {
        matches!(self, RunPhase::Idle | RunPhase::Finished)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Line { run_id: RunId, line: String },
    Finished { run_id: RunId, status: RunStatus },
}

/// Receives a run's output and terminal status on the consumer's thread.
pub trait RunObserver {
    fn on_line(&mut self, run_id: RunId, line: &str);
    fn on_status(&mut self, run_id: RunId, status: &RunStatus);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("another run is still in flight")]
    Busy,
    #[error("process worker is not running")]
    WorkerUnavailable,
}
