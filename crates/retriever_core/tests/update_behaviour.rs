use std::sync::Once;

use retriever_core::{
    update, AppState, CommandLine, Effect, Msg, Notice, RunKind, RunStatus, SessionState,
    ValidationError, MAX_OUTPUT_LINES,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(retriever_logging::initialize_for_tests);
}

fn command() -> CommandLine {
    CommandLine::unchecked("bin/retriever", ["--info", "doc.pdf"])
}

fn start(kind: RunKind) -> (AppState, Vec<Effect>) {
    update(
        AppState::new(),
        Msg::RunRequested {
            kind,
            command: command(),
        },
    )
}

#[test]
fn run_request_starts_session_and_emits_execute() {
    init_logging();
    let (mut state, effects) = start(RunKind::Info);

    assert_eq!(state.session(), SessionState::Running(RunKind::Info));
    assert_eq!(
        effects,
        vec![Effect::Execute {
            kind: RunKind::Info,
            command: command(),
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn second_request_while_running_is_busy() {
    init_logging();
    let (state, _) = start(RunKind::Crack);
    let (state, _) = update(state, Msg::OutputLine("trying 1".to_string()));

    let (state, effects) = update(
        state,
        Msg::RunRequested {
            kind: RunKind::Probe,
            command: command(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.session, SessionState::Running(RunKind::Crack));
    assert_eq!(view.output, vec!["trying 1".to_string()]);
    assert_eq!(
        view.notice,
        Some(Notice::Busy {
            requested: RunKind::Probe
        })
    );
}

#[test]
fn cancel_moves_running_to_cancelling_once() {
    init_logging();
    let (state, _) = start(RunKind::Crack);

    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::Cancel]);
    assert_eq!(state.session(), SessionState::Cancelling(RunKind::Crack));

    let (state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::RunFinished(RunStatus::Cancelled));
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.last_status(), Some(&RunStatus::Cancelled));
}

#[test]
fn cancel_while_idle_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::CancelClicked);
    assert!(effects.is_empty());
    assert_eq!(state, next);
}

#[test]
fn validation_failure_sets_notice_without_effects() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ValidationFailed {
            kind: RunKind::Crack,
            error: ValidationError::NoCharacterClasses,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(
        state.view().notice,
        Some(Notice::Invalid {
            kind: RunKind::Crack,
            error: ValidationError::NoCharacterClasses,
        })
    );
}

#[test]
fn rejected_execute_returns_to_idle() {
    init_logging();
    let (state, _) = start(RunKind::Info);
    let (state, _) = update(
        state,
        Msg::ExecuteRejected {
            reason: "busy".to_string(),
        },
    );
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.view().notice, Some(Notice::Rejected("busy".to_string())));
    assert_eq!(state.last_status(), None);
}

#[test]
fn finish_records_status_and_allows_next_run() {
    init_logging();
    let (state, _) = start(RunKind::Probe);
    let (state, _) = update(state, Msg::OutputLine("last".to_string()));
    let (state, _) = update(state, Msg::RunFinished(RunStatus::CompletedWithError(2)));

    let view = state.view();
    assert_eq!(view.session, SessionState::Idle);
    assert_eq!(view.output.last().map(String::as_str), Some("last"));
    assert_eq!(view.last_status, Some(RunStatus::CompletedWithError(2)));

    let (state, effects) = update(
        state,
        Msg::RunRequested {
            kind: RunKind::Info,
            command: command(),
        },
    );
    assert_eq!(effects.len(), 1);
    assert!(state.view().output.is_empty());
    assert_eq!(state.last_status(), None);
}

#[test]
fn lines_outside_a_run_are_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::OutputLine("stray".to_string()));
    assert!(state.view().output.is_empty());

    let (state, _) = update(state, Msg::RunFinished(RunStatus::Completed));
    assert_eq!(state.last_status(), None);
}

#[test]
fn output_buffer_is_bounded() {
    init_logging();
    let (mut state, _) = start(RunKind::Crack);
    let total = MAX_OUTPUT_LINES + 5;
    for i in 0..total {
        state = update(state, Msg::OutputLine(format!("line {i}"))).0;
    }

    let view = state.view();
    assert_eq!(view.output.len(), MAX_OUTPUT_LINES);
    assert_eq!(view.first_line_index, 5);
    assert_eq!(view.output[0], "line 5");
    assert_eq!(view.output.last().unwrap(), &format!("line {}", total - 1));
}

#[test]
fn started_run_exposes_quoted_command() {
    init_logging();
    let spaced = CommandLine::unchecked("bin/retriever", ["--pdf", "my doc.pdf"]);
    let (state, _) = update(
        AppState::new(),
        Msg::RunRequested {
            kind: RunKind::Crack,
            command: spaced,
        },
    );

    assert_eq!(
        state.view().command.as_deref(),
        Some("bin/retriever --pdf 'my doc.pdf'")
    );

    // A busy rejection keeps the in-flight command.
    let (state, _) = update(
        state,
        Msg::RunRequested {
            kind: RunKind::Info,
            command: command(),
        },
    );
    assert_eq!(
        state.view().command.as_deref(),
        Some("bin/retriever --pdf 'my doc.pdf'")
    );
}
