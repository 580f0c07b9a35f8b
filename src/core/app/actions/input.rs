use super::{App, AppAction, AppCommand};

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::ClearIntent => {
            app.ui.clear_intent();
            None
        }
        AppAction::ToggleFocus => {
            app.ui.toggle_focus();
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}
