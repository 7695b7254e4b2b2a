use std::path::Path;

use crate::{CommandLine, SelectionState, ValidationError};

/// Answers whether a path names an existing regular file.
pub trait FileCheck {
    fn is_file(&self, path: &Path) -> bool;
}

/// Checks against the host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFiles;

impl FileCheck for HostFiles {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Builds `--info <target>` followed by the common tail.
pub fn build_info_command(
    state: &SelectionState,
    files: &dyn FileCheck,
) -> Result<CommandLine, ValidationError> {
    build_with_prefix(state, files, "--info")
}

/// Builds `--pdf <target>` followed by the common tail.
pub fn build_crack_command(
    state: &SelectionState,
    files: &dyn FileCheck,
) -> Result<CommandLine, ValidationError> {
    build_with_prefix(state, files, "--pdf")
}

fn build_with_prefix(
    state: &SelectionState,
    files: &dyn FileCheck,
    flag: &str,
) -> Result<CommandLine, ValidationError> {
    let tail = build_common_args(state, files)?;
    // Validated above, so the target is present.
    let target = state.target().ok_or(ValidationError::MissingTarget)?;

    let mut args = Vec::with_capacity(tail.len() + 2);
    args.push(flag.to_string());
    args.push(target.display().to_string());
    args.extend(tail);
    Ok(CommandLine::new(state.binary_path.clone(), args))
}

/// Validates the whole selection, then emits the option tail shared by the
/// info and crack commands.
pub fn build_common_args(
    state: &SelectionState,
    files: &dyn FileCheck,
) -> Result<Vec<String>, ValidationError> {
    validate(state, files)?;

    let mut args = Vec::new();
    if let Some(wordlist) = state.wordlist() {
        args.push("--wordlist".to_string());
        args.push(wordlist.display().to_string());
    }
    push_number(&mut args, "--min-length", state.min_length);
    push_number(&mut args, "--max-length", state.max_length);
    push_number(&mut args, "--threads", state.threads);

    if !state.custom_characters.is_empty() {
        args.push("--custom-chars".to_string());
        args.push(state.custom_characters.clone());
        if state.use_custom_only {
            args.push("--use-custom-only".to_string());
        }
    }

    if !state.use_custom_only {
        for (class, enabled) in state.classes.in_wire_order() {
            let verb = if enabled { "include" } else { "exclude" };
            args.push(format!("--{verb}-{class}"));
        }
    }

    Ok(args)
}

fn validate(state: &SelectionState, files: &dyn FileCheck) -> Result<(), ValidationError> {
    if !files.is_file(&state.binary_path) {
        return Err(ValidationError::MissingBinary(state.binary_path.clone()));
    }

    let target = state.target().ok_or(ValidationError::MissingTarget)?;
    if !files.is_file(target) {
        return Err(ValidationError::TargetNotFound(target.to_path_buf()));
    }

    if let Some(wordlist) = state.wordlist() {
        if !files.is_file(wordlist) {
            return Err(ValidationError::WordlistNotFound(wordlist.to_path_buf()));
        }
    }

    if state.use_custom_only {
        if state.custom_characters.is_empty() {
            return Err(ValidationError::MissingCustomCharacters);
        }
    } else if !state.classes.any() {
        // Enforced even when custom characters are also supplied.
        return Err(ValidationError::NoCharacterClasses);
    }

    Ok(())
}

fn push_number(args: &mut Vec<String>, flag: &str, value: Option<u32>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}
