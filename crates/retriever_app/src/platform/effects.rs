use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use retriever_core::{Effect, Msg, RunStatus};
use retriever_engine::{CancellationToken, ProcessRunner, RunEvents, RunId, RunObserver};
use retriever_logging::{runner_debug, runner_info, runner_warn};

/// Carries out the effects requested by `update` against the process runner.
pub struct EffectRunner {
    runner: ProcessRunner,
    /// Token of the most recently started run.
    token: Option<CancellationToken>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> io::Result<Self> {
        let (runner, events) = ProcessRunner::new()?;
        spawn_event_loop(events, msg_tx.clone())?;
        Ok(Self {
            runner,
            token: None,
            msg_tx,
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Execute { kind, command } => {
                    runner_info!("Execute kind={} args={}", kind, command.args.len());
                    let token = CancellationToken::new();
                    match self.runner.execute(command, token.clone()) {
                        Ok(run_id) => {
                            runner_debug!("Run {} accepted", run_id);
                            self.token = Some(token);
                        }
                        Err(err) => {
                            runner_warn!("Runner rejected {} request: {}", kind, err);
                            self.post(Msg::ExecuteRejected {
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                Effect::Cancel => match &self.token {
                    Some(token) => {
                        runner_info!("Cancellation requested");
                        token.cancel();
                    }
                    None => runner_debug!("Cancel with no run started"),
                },
            }
        }
    }

    /// Sends `msg` to the control loop; false once the loop has gone away.
    fn post(&self, msg: Msg) -> bool {
        match self.msg_tx.send(msg) {
            Ok(()) => true,
            Err(mpsc::SendError(msg)) => {
                runner_debug!("Control loop gone; dropped {:?}", msg);
                false
            }
        }
    }
}

/// Re-posts run events as messages for the control thread.
struct MsgForwarder {
    msg_tx: mpsc::Sender<Msg>,
    closed: bool,
}

impl MsgForwarder {
    fn send(&mut self, msg: Msg) {
        if self.msg_tx.send(msg).is_err() {
            self.closed = true;
        }
    }
}

impl RunObserver for MsgForwarder {
    fn on_line(&mut self, _run_id: RunId, line: &str) {
        self.send(Msg::OutputLine(line.to_string()));
    }

    fn on_status(&mut self, run_id: RunId, status: &RunStatus) {
        runner_info!("Run {} finished: {}", run_id, status);
        self.send(Msg::RunFinished(status.clone()));
    }
}

fn spawn_event_loop(events: RunEvents, msg_tx: mpsc::Sender<Msg>) -> io::Result<()> {
    thread::Builder::new()
        .name("run-events".to_string())
        .spawn(move || {
            let mut forwarder = MsgForwarder {
                msg_tx,
                closed: false,
            };
            while !forwarder.closed {
                match events.dispatch_next(&mut forwarder, Duration::from_millis(100)) {
                    Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            runner_debug!("Run event loop exiting");
        })?;
    Ok(())
}
