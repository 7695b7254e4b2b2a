use crate::{CommandLine, RunKind, RunStatus, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for a run and the selection validated.
    RunRequested { kind: RunKind, command: CommandLine },
    /// User asked for a run but the selection did not validate.
    ValidationFailed {
        kind: RunKind,
        error: ValidationError,
    },
    /// User clicked Cancel.
    CancelClicked,
    /// The process runner refused the command.
    ExecuteRejected { reason: String },
    /// One line of merged child output.
    OutputLine(String),
    /// Terminal status of the in-flight run.
    RunFinished(RunStatus),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
