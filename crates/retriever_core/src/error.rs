use std::path::PathBuf;

use thiserror::Error;

/// Pre-flight rejection of a selection. No process is spawned when one of
/// these is returned, and no partial argument vector exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("executable not found: {0}")]
    MissingBinary(PathBuf),
    #[error("no target file selected")]
    MissingTarget,
    #[error("target file not found: {0}")]
    TargetNotFound(PathBuf),
    #[error("wordlist not found: {0}")]
    WordlistNotFound(PathBuf),
    #[error("custom-only mode needs at least one custom character")]
    MissingCustomCharacters,
    #[error("select at least one character class")]
    NoCharacterClasses,
    #[error("invalid probe options: {0}")]
    InvalidProbeOptions(String),
}
