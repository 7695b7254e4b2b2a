use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use retriever_core::{CommandLine, RunStatus};
use retriever_logging::{runner_debug, runner_error, runner_info, runner_warn, set_run_id};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::pipe::attach_output;
use crate::signal::request_termination;
use crate::stream::forward_lines;
use crate::{ExecuteError, RunEvent, RunId, RunObserver, RunPhase};

enum WorkerCommand {
    Execute {
        run_id: RunId,
        command: CommandLine,
        token: CancellationToken,
    },
}

/// Control-thread handle for launching runs.
///
/// Runs execute one at a time on a dedicated worker thread. Their events are
/// read from the paired [`RunEvents`].
pub struct ProcessRunner {
    cmd_tx: mpsc::Sender<WorkerCommand>,
    phase: Arc<AtomicU8>,
    next_run_id: AtomicU64,
}

/// Consumer side of a [`ProcessRunner`]: the single place run events come out.
pub struct RunEvents {
    event_rx: mpsc::Receiver<RunEvent>,
    phase: Arc<AtomicU8>,
}

impl ProcessRunner {
    pub fn new() -> io::Result<(Self, RunEvents)> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (event_tx, event_rx) = mpsc::channel::<RunEvent>();
        let phase = Arc::new(AtomicU8::new(RunPhase::Idle.to_u8()));

        let worker_phase = phase.clone();
        thread::Builder::new()
            .name("process-runner".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        WorkerCommand::Execute {
                            run_id,
                            command,
                            token,
                        } => {
                            set_run_id(Some(run_id));
                            let status = runtime.block_on(drive_run(
                                run_id,
                                &command,
                                &token,
                                &event_tx,
                                &worker_phase,
                            ));
                            runner_info!("Finished: {}", status);
                            if event_tx.send(RunEvent::Finished { run_id, status }).is_err() {
                                runner_debug!("Event consumer gone; status dropped");
                            }
                            set_run_id(None);
                        }
                    }
                }
                runner_debug!("Process worker exiting");
            })?;

        let runner = Self {
            cmd_tx,
            phase: phase.clone(),
            next_run_id: AtomicU64::new(0),
        };
        Ok((runner, RunEvents { event_rx, phase }))
    }

    /// Hands `command` to the worker and returns immediately.
    ///
    /// Rejected with [`ExecuteError::Busy`] while a previous run has not yet
    /// reported its terminal status; the in-flight run is not affected.
    pub fn execute(
        &self,
        command: CommandLine,
        token: CancellationToken,
    ) -> Result<RunId, ExecuteError> {
        self.phase
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |raw| {
                RunPhase::from_u8(raw)
                    .accepts_execute()
                    .then(|| RunPhase::Launching.to_u8())
            })
            .map_err(|_| ExecuteError::Busy)?;

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed) + 1;
        let sent = self.cmd_tx.send(WorkerCommand::Execute {
            run_id,
            command,
            token,
        });
        if sent.is_err() {
            runner_error!("Process worker is gone; run {} not started", run_id);
            self.phase.store(RunPhase::Idle.to_u8(), Ordering::SeqCst);
            return Err(ExecuteError::WorkerUnavailable);
        }
        Ok(run_id)
    }

    pub fn phase(&self) -> RunPhase {
        RunPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn is_busy(&self) -> bool {
        !self.phase().accepts_execute()
    }
}

impl RunEvents {
    pub fn try_recv(&self) -> Option<RunEvent> {
        self.event_rx.try_recv().ok().map(|event| self.observe(event))
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RunEvent> {
        self.event_rx
            .recv_timeout(timeout)
            .ok()
            .map(|event| self.observe(event))
    }

    /// Delivers every pending event to `observer` on the calling thread and
    /// returns how many were delivered.
    pub fn dispatch_pending(&self, observer: &mut dyn RunObserver) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.try_recv() {
            deliver(observer, &event);
            delivered += 1;
        }
        delivered
    }

    /// Waits up to `timeout` for one event and delivers it to `observer`.
    ///
    /// Fails with `Disconnected` once the worker is gone and the channel is
    /// drained.
    pub fn dispatch_next(
        &self,
        observer: &mut dyn RunObserver,
        timeout: Duration,
    ) -> Result<(), RecvTimeoutError> {
        let event = self.event_rx.recv_timeout(timeout)?;
        deliver(observer, &self.observe(event));
        Ok(())
    }

    // The slot frees up only once the terminal status reaches the consumer.
    fn observe(&self, event: RunEvent) -> RunEvent {
        if matches!(event, RunEvent::Finished { .. }) {
            self.phase
                .store(RunPhase::Finished.to_u8(), Ordering::SeqCst);
        }
        event
    }
}

fn deliver(observer: &mut dyn RunObserver, event: &RunEvent) {
    match event {
        RunEvent::Line { run_id, line } => observer.on_line(*run_id, line),
        RunEvent::Finished { run_id, status } => observer.on_status(*run_id, status),
    }
}

async fn drive_run(
    run_id: RunId,
    command: &CommandLine,
    token: &CancellationToken,
    events: &mpsc::Sender<RunEvent>,
    phase: &AtomicU8,
) -> RunStatus {
    runner_info!("Spawning {}", command);
    let mut process = Command::new(&command.program);
    process.args(&command.args).stdin(Stdio::null());
    // Keep the child out of the terminal's process group so Ctrl-C reaches
    // only the front end, which then cancels through the token.
    #[cfg(unix)]
    process.process_group(0);

    let spawned = attach_output(&mut process).and_then(|source| {
        let child = process.spawn()?;
        Ok((child, source))
    });
    // Closes the parent's copies of the pipe's write end.
    drop(process);
    let (mut child, source) = match spawned {
        Ok(spawned) => spawned,
        Err(err) => {
            runner_warn!("Failed to launch {}: {}", command.program.display(), err);
            return RunStatus::LaunchFailed(err.to_string());
        }
    };
    phase.store(RunPhase::Running.to_u8(), Ordering::SeqCst);

    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let readers: Vec<_> = source
        .into_readers(&mut child)
        .into_iter()
        .map(|(reader, label)| tokio::spawn(forward_lines(reader, line_tx.clone(), label)))
        .collect();
    drop(line_tx);

    let cancelled = loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break true,
            line = line_rx.recv() => match line {
                Some(line) => {
                    if token.is_cancelled() {
                        break true;
                    }
                    if events.send(RunEvent::Line { run_id, line }).is_err() {
                        runner_debug!("Event consumer gone; dropping output");
                    }
                }
                None => break false,
            },
        }
    };

    if cancelled {
        runner_info!("Cancellation observed; requesting termination");
        request_termination(&mut child);
        drop(line_rx);
    }

    let exit = child.wait().await;
    for reader in readers {
        reader.abort();
    }

    if cancelled || token.is_cancelled() {
        return RunStatus::Cancelled;
    }
    match exit {
        Ok(status) if status.success() => RunStatus::Completed,
        Ok(status) => RunStatus::CompletedWithError(exit_code(status)),
        Err(err) => {
            runner_error!("Failed waiting for child: {}", err);
            RunStatus::CompletedWithError(-1)
        }
    }
}

/// Exit code of the child; on Unix a signal death maps to `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
