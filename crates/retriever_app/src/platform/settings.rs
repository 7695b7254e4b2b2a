use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::LogDestination;

pub(crate) const SETTINGS_FILENAME: &str = "retriever_frontend.ron";

/// Optional front end settings, read from a RON file.
///
/// ```ron
/// (
///     retriever_binary: Some("/opt/retriever/pdf_password_retriever"),
///     default_threads: Some(4),
///     log: Some(Both),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FrontendSettings {
    pub retriever_binary: Option<PathBuf>,
    pub probe_binary: Option<PathBuf>,
    pub default_threads: Option<u32>,
    pub log: Option<LogDestination>,
    /// Log file path; `./retriever_frontend.log` when unset.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Reads settings from `path`. A missing file is `Ok(None)`.
pub(crate) fn read_settings(path: &Path) -> Result<Option<FrontendSettings>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}
