use crate::view_model::Notice;
use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RunRequested { kind, command } => {
            if state.session().is_busy() {
                // Single flight: the in-flight run is left untouched.
                state.set_notice(Notice::Busy { requested: kind });
                Vec::new()
            } else {
                state.start_run(kind, command.quoted());
                vec![Effect::Execute { kind, command }]
            }
        }
        Msg::ValidationFailed { kind, error } => {
            state.set_notice(Notice::Invalid { kind, error });
            Vec::new()
        }
        Msg::CancelClicked => match state.session() {
            SessionState::Running(_) => {
                state.begin_cancel();
                vec![Effect::Cancel]
            }
            SessionState::Idle | SessionState::Cancelling(_) => Vec::new(),
        },
        Msg::ExecuteRejected { reason } => {
            if state.session().is_busy() {
                state.abandon(Notice::Rejected(reason));
            }
            Vec::new()
        }
        Msg::OutputLine(line) => {
            if state.session().is_busy() {
                state.push_line(line);
            }
            Vec::new()
        }
        Msg::RunFinished(status) => {
            if state.session().is_busy() {
                state.finish(status);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
