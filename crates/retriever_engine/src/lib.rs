//! Retriever engine: runs one external process at a time on a dedicated
//! worker and streams its output back to a single consumer.
mod pipe;
mod runner;
mod signal;
mod stream;
mod types;

pub use runner::{ProcessRunner, RunEvents};
pub use stream::decode_line;
pub use types::{ExecuteError, RunEvent, RunId, RunObserver, RunPhase};
pub use tokio_util::sync::CancellationToken;
