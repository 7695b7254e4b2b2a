mod app;
mod effects;
mod logging;
mod settings;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use retriever_core::{
    build_crack_command, build_info_command, build_probe_command, resolve_binary, HostFiles, Msg,
    RunKind, PROBE_BINARY_STEM, RETRIEVER_BINARY_STEM,
};
use retriever_logging::{runner_info, runner_warn};

use crate::cli::{Action, Cli};

pub use logging::LogDestination;
use logging::LogOptions;
use settings::{read_settings, FrontendSettings, SETTINGS_FILENAME};

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));
    let loaded = read_settings(&settings_path);
    let settings = match &loaded {
        Ok(Some(settings)) => settings.clone(),
        Ok(None) | Err(_) => FrontendSettings::default(),
    };

    logging::initialize(&LogOptions::new(
        cli.log.or(settings.log).unwrap_or_default(),
        cli.verbose,
        settings.log_file.clone(),
    ));
    match loaded {
        Ok(Some(_)) => runner_info!("Loaded settings from {:?}", settings_path),
        Ok(None) if cli.settings.is_some() => {
            runner_warn!("Settings file {:?} not found; using defaults", settings_path)
        }
        Ok(None) => {}
        Err(err) => runner_warn!("{}; using defaults", err),
    }

    let initial = initial_msg(&cli.action, &settings, &executable_dir());
    let view = app::run_app(initial)?;
    Ok(ExitCode::from(app::exit_status_byte(&view)))
}

/// Builds and validates the command for `action`. Validation happens here,
/// before anything reaches the orchestrator or the process runner.
fn initial_msg(action: &Action, settings: &FrontendSettings, base_dir: &Path) -> Msg {
    let (kind, built) = match action {
        Action::Info(args) | Action::Crack(args) => {
            let binary = resolve_binary(
                args.binary.as_deref(),
                settings.retriever_binary.as_deref(),
                base_dir,
                RETRIEVER_BINARY_STEM,
                &HostFiles,
            );
            let selection = args.selection(binary, settings.default_threads);
            if matches!(action, Action::Info(_)) {
                (RunKind::Info, build_info_command(&selection, &HostFiles))
            } else {
                (RunKind::Crack, build_crack_command(&selection, &HostFiles))
            }
        }
        Action::Probe(args) => {
            let binary = resolve_binary(
                args.binary.as_deref(),
                settings.probe_binary.as_deref(),
                base_dir,
                PROBE_BINARY_STEM,
                &HostFiles,
            );
            (
                RunKind::Probe,
                build_probe_command(&args.selection(binary), &HostFiles),
            )
        }
    };

    match built {
        Ok(command) => Msg::RunRequested { kind, command },
        Err(error) => {
            runner_warn!("Rejected {} request: {}", kind, error);
            Msg::ValidationFailed { kind, error }
        }
    }
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
