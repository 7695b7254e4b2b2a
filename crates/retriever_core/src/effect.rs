use crate::{CommandLine, RunKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the command to the process runner.
    Execute { kind: RunKind, command: CommandLine },
    /// Signal the in-flight run's cancellation token.
    Cancel,
}
