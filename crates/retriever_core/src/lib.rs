//! Retriever core: argument synthesis and the pure orchestration state machine.
mod args;
mod binary;
mod command;
mod effect;
mod error;
mod msg;
mod probe;
mod selection;
mod state;
mod status;
mod update;
mod view_model;

pub use args::{build_common_args, build_crack_command, build_info_command, FileCheck, HostFiles};
pub use binary::{
    binary_candidates, default_binary_path, resolve_binary, PROBE_BINARY_STEM,
    RETRIEVER_BINARY_STEM,
};
pub use command::{CommandLine, RunKind};
pub use effect::Effect;
pub use error::ValidationError;
pub use msg::Msg;
pub use probe::build_probe_command;
pub use selection::{CharacterClasses, HashMode, ProbeSelection, SelectionState};
pub use state::{AppState, SessionState, MAX_OUTPUT_LINES};
pub use status::RunStatus;
pub use update::update;
pub use view_model::{AppViewModel, Notice};
