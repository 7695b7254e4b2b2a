use tokio::process::Child;

/// Asks the child to terminate. This is a request, not a kill: a child that
/// ignores it keeps running and keeps the worker waiting.
#[cfg(unix)]
pub(crate) fn request_termination(child: &mut Child) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use retriever_logging::{runner_debug, runner_warn};

    let Some(pid) = child.id() else {
        runner_debug!("Child already reaped; nothing to signal");
        return;
    };
    let Ok(raw) = i32::try_from(pid) else {
        runner_warn!("Child pid {} out of range; not signalling", pid);
        return;
    };
    if let Err(err) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        runner_warn!("Failed to send SIGTERM to pid {}: {}", pid, err);
    }
}

/// Windows has no polite termination request for arbitrary console
/// processes; `TerminateProcess` is the closest equivalent.
#[cfg(not(unix))]
pub(crate) fn request_termination(child: &mut Child) {
    use retriever_logging::runner_warn;

    if let Err(err) = child.start_kill() {
        runner_warn!("Failed to terminate child: {}", err);
    }
}
