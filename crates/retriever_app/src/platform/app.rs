use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use retriever_core::{update, AppState, AppViewModel, Msg, Notice, RunStatus};
use retriever_logging::runner_info;

use super::effects::EffectRunner;
use super::ui::render::TerminalRenderer;

/// Render tick while waiting for run events.
const TICK: Duration = Duration::from_millis(75);

/// Drives one user action to completion on the calling (control) thread and
/// returns the final view.
pub fn run_app(initial: Msg) -> anyhow::Result<AppViewModel> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_interrupt_listener(msg_tx.clone()).context("failed to install Ctrl-C handler")?;
    let effects = EffectRunner::new(msg_tx).context("failed to start process worker")?;

    let mut handler = AppEventHandler::new(
        effects,
        TerminalRenderer::new(io::stdout(), io::stderr()),
    );
    handler.dispatch_msg(initial);

    while handler.is_busy() {
        let msg = match msg_rx.recv_timeout(TICK) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => Msg::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        handler.dispatch_msg(msg);
    }

    Ok(handler.state.view())
}

struct AppEventHandler {
    state: AppState,
    effects: EffectRunner,
    renderer: TerminalRenderer<io::Stdout, io::Stderr>,
}

impl AppEventHandler {
    fn new(effects: EffectRunner, renderer: TerminalRenderer<io::Stdout, io::Stderr>) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer,
        }
    }

    fn is_busy(&self) -> bool {
        self.state.session().is_busy()
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;

        self.effects.enqueue(effects);
        if let Some(view) = view {
            self.renderer.render(&view);
        }
    }
}

/// Ctrl-C requests cancellation of the in-flight run.
fn spawn_interrupt_listener(msg_tx: mpsc::Sender<Msg>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    runner_info!("Interrupt received");
                    if msg_tx.send(Msg::CancelClicked).is_err() {
                        break;
                    }
                }
            });
        })?;
    Ok(())
}

/// Process exit status for the final view.
///
/// The child's own code is passed through; cancellation follows the shell
/// convention for SIGINT.
pub fn exit_status_byte(view: &AppViewModel) -> u8 {
    match (&view.last_status, &view.notice) {
        (Some(RunStatus::Completed), _) => 0,
        (Some(RunStatus::CompletedWithError(code)), _) => match u8::try_from(*code) {
            Ok(0) | Err(_) => 1,
            Ok(byte) => byte,
        },
        (Some(RunStatus::Cancelled), _) => 130,
        (Some(RunStatus::LaunchFailed(_)), _) => 127,
        (None, Some(Notice::Invalid { .. })) => 2,
        (None, _) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retriever_core::{RunKind, ValidationError};

    fn finished(status: RunStatus) -> AppViewModel {
        AppViewModel {
            last_status: Some(status),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn exit_status_follows_run_outcome() {
        assert_eq!(exit_status_byte(&finished(RunStatus::Completed)), 0);
        assert_eq!(
            exit_status_byte(&finished(RunStatus::CompletedWithError(2))),
            2
        );
        assert_eq!(
            exit_status_byte(&finished(RunStatus::CompletedWithError(-1))),
            1
        );
        assert_eq!(exit_status_byte(&finished(RunStatus::Cancelled)), 130);
        assert_eq!(
            exit_status_byte(&finished(RunStatus::LaunchFailed("nope".into()))),
            127
        );
    }

    #[test]
    fn validation_failure_exits_with_usage_code() {
        let view = AppViewModel {
            notice: Some(Notice::Invalid {
                kind: RunKind::Crack,
                error: ValidationError::NoCharacterClasses,
            }),
            ..AppViewModel::default()
        };
        assert_eq!(exit_status_byte(&view), 2);
        assert_eq!(
            exit_status_byte(&AppViewModel {
                notice: Some(Notice::Rejected("busy".into())),
                ..AppViewModel::default()
            }),
            1
        );
    }
}
