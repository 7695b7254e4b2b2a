use std::collections::VecDeque;

use crate::view_model::{AppViewModel, Notice};
use crate::{RunKind, RunStatus};

/// Upper bound on buffered output lines; older lines are dropped first.
pub const MAX_OUTPUT_LINES: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running(RunKind),
    Cancelling(RunKind),
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    /// Shell-quoted command line of the current or last run.
    command: Option<String>,
    output: VecDeque<String>,
    lines_seen: u64,
    last_status: Option<RunStatus>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn last_status(&self) -> Option<&RunStatus> {
        self.last_status.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            command: self.command.clone(),
            output: self.output.iter().cloned().collect(),
            first_line_index: self.lines_seen - self.output.len() as u64,
            last_status: self.last_status.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn start_run(&mut self, kind: RunKind, command: String) {
        self.session = SessionState::Running(kind);
        self.command = Some(command);
        self.output.clear();
        self.lines_seen = 0;
        self.last_status = None;
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn begin_cancel(&mut self) {
        if let SessionState::Running(kind) = self.session {
            self.session = SessionState::Cancelling(kind);
            self.dirty = true;
        }
    }

    pub(crate) fn push_line(&mut self, line: String) {
        if self.output.len() == MAX_OUTPUT_LINES {
            self.output.pop_front();
        }
        self.output.push_back(line);
        self.lines_seen += 1;
        self.dirty = true;
    }

    pub(crate) fn finish(&mut self, status: RunStatus) {
        self.session = SessionState::Idle;
        self.last_status = Some(status);
        self.dirty = true;
    }

    pub(crate) fn abandon(&mut self, notice: Notice) {
        self.session = SessionState::Idle;
        self.set_notice(notice);
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }
}
