#![deny(missing_docs)]
//! Shared logging utilities for the retriever front end workspace.
//!
//! This crate provides the `runner_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Records emitted while
//! a run id is set on the current thread are prefixed with `[run N]`.

use std::cell::Cell;
use std::fmt;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the id of the run being driven on this thread.
    static RUN_ID: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets the run id for the current thread.
/// The process worker calls this when it starts driving a run and clears it
/// with `None` once the terminal status has been sent.
pub fn set_run_id(run_id: Option<u64>) {
    RUN_ID.with(|v| v.set(run_id));
}

/// Retrieves the run id for the current thread, if any.
pub fn current_run_id() -> Option<u64> {
    RUN_ID.with(|v| v.get())
}

/// Emits one record, prefixed with the run id when one is set.
#[doc(hidden)]
pub fn emit(target: &str, level: log::Level, args: fmt::Arguments<'_>) {
    match current_run_id() {
        Some(run_id) => log::log!(target: target, level, "[run {}] {}", run_id, args),
        None => log::log!(target: target, level, "{}", args),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! runner_trace {
    ($($arg:tt)*) => {{
        $crate::emit(module_path!(), $crate::log::Level::Trace, format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! runner_debug {
    ($($arg:tt)*) => {{
        $crate::emit(module_path!(), $crate::log::Level::Debug, format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! runner_info {
    ($($arg:tt)*) => {{
        $crate::emit(module_path!(), $crate::log::Level::Info, format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! runner_warn {
    ($($arg:tt)*) => {{
        $crate::emit(module_path!(), $crate::log::Level::Warn, format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! runner_error {
    ($($arg:tt)*) => {{
        $crate::emit(module_path!(), $crate::log::Level::Error, format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
