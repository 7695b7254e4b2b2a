use crate::{CommandLine, FileCheck, ProbeSelection, ValidationError};

/// Builds the benchmark probe command line.
///
/// Emission order: `--lengths`, `--attempts`, `--hash`, `--include-special`,
/// `--custom`, then any free-form options split on shell-word boundaries.
pub fn build_probe_command(
    selection: &ProbeSelection,
    files: &dyn FileCheck,
) -> Result<CommandLine, ValidationError> {
    if !files.is_file(&selection.binary_path) {
        return Err(ValidationError::MissingBinary(selection.binary_path.clone()));
    }
    let extra = shell_words::split(&selection.extra_options)
        .map_err(|err| ValidationError::InvalidProbeOptions(err.to_string()))?;

    let mut args = Vec::new();
    if !selection.lengths.is_empty() {
        let csv = selection
            .lengths
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        args.push("--lengths".to_string());
        args.push(csv);
    }
    if let Some(attempts) = selection.attempts {
        args.push("--attempts".to_string());
        args.push(attempts.to_string());
    }
    args.push("--hash".to_string());
    args.push(selection.hash.as_str().to_string());
    if selection.include_special {
        args.push("--include-special".to_string());
    }
    if !selection.custom.is_empty() {
        args.push("--custom".to_string());
        args.push(selection.custom.clone());
    }
    args.extend(extra);

    Ok(CommandLine::new(selection.binary_path.clone(), args))
}
