use std::path::{Path, PathBuf};

use crate::FileCheck;

/// File stem of the password-recovery executable.
pub const RETRIEVER_BINARY_STEM: &str = "pdf_password_retriever";
/// File stem of the device benchmark executable.
pub const PROBE_BINARY_STEM: &str = "device_probe";

/// Places an executable named `stem` may live under `root`, most preferred first.
pub fn binary_candidates(root: &Path, stem: &str) -> Vec<PathBuf> {
    let exe_name = format!("{stem}{}", std::env::consts::EXE_SUFFIX);
    let mut candidates = vec![root.join(&exe_name), root.join("build").join(&exe_name)];
    if cfg!(windows) {
        candidates.push(root.join("build").join("Release").join(&exe_name));
        candidates.push(root.join("build").join("Debug").join(&exe_name));
    }
    candidates
}

/// First candidate under `root` that exists, else the first candidate.
pub fn default_binary_path(root: &Path, stem: &str, files: &dyn FileCheck) -> PathBuf {
    let candidates = binary_candidates(root, stem);
    match candidates.iter().find(|candidate| files.is_file(candidate)) {
        Some(found) => found.clone(),
        None => candidates
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from(stem)),
    }
}

/// Picks the executable to run: an explicit path wins, then a configured one,
/// then the default search under `root`. Empty paths count as unset.
pub fn resolve_binary(
    explicit: Option<&Path>,
    configured: Option<&Path>,
    root: &Path,
    stem: &str,
    files: &dyn FileCheck,
) -> PathBuf {
    explicit
        .into_iter()
        .chain(configured)
        .find(|path| !path.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_binary_path(root, stem, files))
}
