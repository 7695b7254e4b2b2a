use std::sync::Once;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use retriever_core::{CommandLine, RunStatus};
use retriever_engine::{
    CancellationToken, ExecuteError, ProcessRunner, RunEvent, RunEvents, RunId, RunObserver,
    RunPhase,
};

const DEADLINE: Duration = Duration::from_secs(10);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(retriever_logging::initialize_for_tests);
}

#[derive(Debug, Default)]
struct Recorder {
    /// Lines and statuses in delivery order.
    calls: Vec<String>,
    lines: Vec<String>,
    status: Option<RunStatus>,
}

impl RunObserver for Recorder {
    fn on_line(&mut self, _run_id: RunId, line: &str) {
        self.calls.push(format!("line:{line}"));
        self.lines.push(line.to_string());
    }

    fn on_status(&mut self, _run_id: RunId, status: &RunStatus) {
        self.calls.push(format!("status:{status}"));
        self.status = Some(status.clone());
    }
}

fn collect_until_finished(events: &RunEvents, recorder: &mut Recorder) {
    let started = Instant::now();
    while recorder.status.is_none() {
        assert!(started.elapsed() < DEADLINE, "run did not finish in time");
        let _ = events.dispatch_next(recorder, Duration::from_millis(50));
    }
}

#[cfg(unix)]
fn sh(script: &str) -> CommandLine {
    CommandLine::unchecked("/bin/sh", ["-c", script])
}

#[cfg(unix)]
#[test]
fn streams_lines_in_order_then_completes() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(sh("echo one; echo two; echo three"), CancellationToken::new())
        .unwrap();

    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);

    assert_eq!(recorder.lines, vec!["one", "two", "three"]);
    assert_eq!(recorder.status, Some(RunStatus::Completed));
    assert_eq!(recorder.calls.last().unwrap(), "status:completed");
    assert_eq!(runner.phase(), RunPhase::Finished);
}

#[cfg(unix)]
#[test]
fn nonzero_exit_reports_code_after_last_line() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(sh("echo working; printf 'last words'; exit 2"), CancellationToken::new())
        .unwrap();

    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);

    assert_eq!(recorder.status, Some(RunStatus::CompletedWithError(2)));
    assert_eq!(
        recorder.calls,
        vec![
            "line:working".to_string(),
            "line:last words".to_string(),
            "status:exited with code 2".to_string(),
        ]
    );
}

#[cfg(unix)]
#[test]
fn stderr_interleaves_with_stdout_in_write_order() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();

    for _ in 0..20 {
        runner
            .execute(
                sh("echo 1; echo 2 >&2; echo 3; echo 4 >&2; echo 5"),
                CancellationToken::new(),
            )
            .unwrap();

        let mut recorder = Recorder::default();
        collect_until_finished(&events, &mut recorder);

        assert_eq!(recorder.lines, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(recorder.status, Some(RunStatus::Completed));
    }
}

#[cfg(unix)]
#[test]
fn child_leads_its_own_process_group() {
    use nix::unistd::{getpgid, getpgrp, Pid};

    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    let token = CancellationToken::new();
    runner
        .execute(sh("echo $$; exec sleep 5"), token.clone())
        .unwrap();

    let started = Instant::now();
    let pid: i32 = loop {
        assert!(started.elapsed() < DEADLINE, "no output before deadline");
        if let Some(RunEvent::Line { line, .. }) = events.recv_timeout(Duration::from_millis(50)) {
            break line.trim().parse().unwrap();
        }
    };

    let group = getpgid(Some(Pid::from_raw(pid))).unwrap();
    assert_eq!(group, Pid::from_raw(pid));
    assert_ne!(group, getpgrp());

    token.cancel();
    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);
    assert_eq!(recorder.status, Some(RunStatus::Cancelled));
}

#[cfg(unix)]
#[test]
fn invalid_utf8_is_replaced() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(sh(r"printf 'bad \377 byte\n'"), CancellationToken::new())
        .unwrap();

    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);

    assert_eq!(recorder.lines, vec!["bad \u{FFFD} byte"]);
    assert_eq!(recorder.status, Some(RunStatus::Completed));
}

#[cfg(unix)]
#[test]
fn execute_while_running_is_busy_and_leaves_run_intact() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(sh("echo first; sleep 0.3; echo second"), CancellationToken::new())
        .unwrap();

    assert!(runner.is_busy());
    assert_eq!(
        runner.execute(sh("echo intruder"), CancellationToken::new()),
        Err(ExecuteError::Busy)
    );

    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);
    assert_eq!(recorder.lines, vec!["first", "second"]);
    assert_eq!(recorder.status, Some(RunStatus::Completed));

    // The slot is free again once the status has been delivered.
    assert!(!runner.is_busy());
    runner
        .execute(sh("echo again"), CancellationToken::new())
        .unwrap();
    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);
    assert_eq!(recorder.lines, vec!["again"]);
}

#[cfg(unix)]
#[test]
fn cancel_reports_cancelled_and_stops_lines() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    let token = CancellationToken::new();
    runner
        .execute(sh("echo started; exec sleep 5"), token.clone())
        .unwrap();

    // Wait for the first line before cancelling.
    let started = Instant::now();
    let first = loop {
        assert!(started.elapsed() < DEADLINE, "no output before deadline");
        if let Some(event) = events.recv_timeout(Duration::from_millis(50)) {
            break event;
        }
    };
    assert!(matches!(first, RunEvent::Line { ref line, .. } if line == "started"));

    token.cancel();
    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);

    assert_eq!(recorder.status, Some(RunStatus::Cancelled));
    assert!(recorder.lines.is_empty());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[cfg(unix)]
#[test]
fn cancel_overrides_exit_code() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    let token = CancellationToken::new();
    // The child traps SIGTERM and exits cleanly; the run is still cancelled.
    runner
        .execute(
            sh("trap 'echo trapped; exit 0' TERM; echo ready; while :; do sleep 0.05; done"),
            token.clone(),
        )
        .unwrap();

    let started = Instant::now();
    loop {
        assert!(started.elapsed() < DEADLINE, "no output before deadline");
        if let Some(RunEvent::Line { line, .. }) = events.recv_timeout(Duration::from_millis(50)) {
            assert_eq!(line, "ready");
            break;
        }
    }

    token.cancel();
    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);
    assert_eq!(recorder.status, Some(RunStatus::Cancelled));
    assert!(recorder.lines.is_empty());
}

#[test]
fn missing_executable_fails_to_launch_without_lines() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(
            CommandLine::unchecked("./definitely/not/a/real/binary", ["--info", "x.pdf"]),
            CancellationToken::new(),
        )
        .unwrap();

    let mut recorder = Recorder::default();
    collect_until_finished(&events, &mut recorder);

    assert!(recorder.lines.is_empty());
    assert!(matches!(recorder.status, Some(RunStatus::LaunchFailed(_))));
    assert_eq!(recorder.calls.len(), 1);
}

#[test]
fn fresh_runner_is_idle() {
    let (runner, events) = ProcessRunner::new().unwrap();
    assert_eq!(runner.phase(), RunPhase::Idle);
    assert!(!runner.is_busy());
    assert!(events.try_recv().is_none());
}

#[cfg(unix)]
#[test]
fn dispatch_pending_drains_on_the_calling_thread() {
    init_logging();
    let (runner, events) = ProcessRunner::new().unwrap();
    runner
        .execute(sh("printf 'a\\nb\\n'"), CancellationToken::new())
        .unwrap();

    let started = Instant::now();
    let mut recorder = Recorder::default();
    while recorder.status.is_none() {
        assert!(started.elapsed() < DEADLINE, "run did not finish in time");
        if events.dispatch_pending(&mut recorder) == 0 {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    assert_eq!(
        recorder.calls,
        vec!["line:a", "line:b", "status:completed"]
    );
    assert_eq!(events.dispatch_pending(&mut recorder), 0);
}
