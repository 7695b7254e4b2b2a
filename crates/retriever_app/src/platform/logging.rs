//! Log setup for the front end.
//!
//! Terminal records go to stderr; stdout carries only child output.

use std::fs::File;
use std::path::PathBuf;

use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub(crate) const LOG_FILENAME: &str = "retriever_frontend.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum LogDestination {
    Off,
    /// The log file only.
    #[default]
    File,
    /// stderr only.
    Terminal,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Logging choices after merging the command line with the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogOptions {
    pub destination: LogDestination,
    pub level: LevelFilter,
    pub file: PathBuf,
}

impl LogOptions {
    pub fn new(destination: LogDestination, verbose: bool, file: Option<PathBuf>) -> Self {
        Self {
            destination,
            level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            file: file.unwrap_or_else(|| PathBuf::from(".").join(LOG_FILENAME)),
        }
    }
}

pub(crate) fn initialize(options: &LogOptions) {
    let loggers = build_loggers(options);
    if loggers.is_empty() {
        return;
    }
    if let Err(err) = CombinedLogger::init(loggers) {
        eprintln!("Warning: logging already initialized: {err}");
    }
}

fn build_loggers(options: &LogOptions) -> Vec<Box<dyn SharedLogger>> {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if options.destination.to_terminal() {
        loggers.push(TermLogger::new(
            options.level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if options.destination.to_file() {
        match File::create(&options.file) {
            Ok(file) => loggers.push(WriteLogger::new(options.level, config, file)),
            // Terminal logging, if any, still goes ahead.
            Err(err) => eprintln!(
                "Warning: could not create log file at {:?}: {}",
                options.file, err
            ),
        }
    }
    loggers
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
