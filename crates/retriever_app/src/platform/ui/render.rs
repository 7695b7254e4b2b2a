use std::io::{self, Write};

use retriever_core::{AppViewModel, Notice, RunStatus, SessionState};
use retriever_logging::runner_warn;

/// Prints the view incrementally: child output goes to `out`, while the
/// command echo, session changes, notices and the final status go to `err`.
pub struct TerminalRenderer<O: Write, E: Write> {
    out: O,
    err: E,
    /// Sequence number of the next output line to print.
    printed: u64,
    session: SessionState,
    notice: Option<Notice>,
    status: Option<RunStatus>,
}

impl<O: Write, E: Write> TerminalRenderer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            printed: 0,
            session: SessionState::Idle,
            notice: None,
            status: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) {
        if let Err(err) = self.try_render(view) {
            runner_warn!("Failed to render to terminal: {}", err);
        }
    }

    fn try_render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.session != self.session {
            match view.session {
                SessionState::Running(kind) => {
                    if !self.session.is_busy() {
                        self.printed = 0;
                    }
                    writeln!(self.err, "Running {kind}...")?;
                    if let Some(command) = &view.command {
                        writeln!(self.err, "Command: {command}")?;
                    }
                }
                SessionState::Cancelling(kind) => writeln!(self.err, "Cancelling {kind}...")?,
                SessionState::Idle => {}
            }
            self.session = view.session;
        }

        if self.printed < view.first_line_index {
            writeln!(
                self.err,
                "[{} output lines dropped]",
                view.first_line_index - self.printed
            )?;
            self.printed = view.first_line_index;
        }
        let skip = (self.printed - view.first_line_index) as usize;
        for line in view.output.iter().skip(skip) {
            writeln!(self.out, "{line}")?;
        }
        self.printed = self
            .printed
            .max(view.first_line_index + view.output.len() as u64);
        self.out.flush()?;

        if view.notice != self.notice {
            if let Some(notice) = &view.notice {
                writeln!(self.err, "{}", describe_notice(notice))?;
            }
            self.notice = view.notice.clone();
        }

        if view.last_status != self.status {
            if let Some(status) = &view.last_status {
                writeln!(self.err, "Finished: {status}")?;
            }
            self.status = view.last_status.clone();
        }
        self.err.flush()
    }
}

fn describe_notice(notice: &Notice) -> String {
    match notice {
        Notice::Busy { requested } => {
            format!("Another run is in progress; {requested} request ignored")
        }
        Notice::Invalid { kind, error } => format!("Cannot start {kind}: {error}"),
        Notice::Rejected(reason) => format!("Run not started: {reason}"),
    }
}
