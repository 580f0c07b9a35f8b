mod input;
mod submission;

use tokio::sync::mpsc;

use super::App;
use crate::api::service::DispatchError;
use crate::api::AgentReply;
use crate::core::dispatch::ScanParams;

pub enum AppAction {
    SubmitScan {
        intent: String,
        target: String,
    },
    ScanSettled {
        submission_id: u64,
        outcome: Result<AgentReply, DispatchError>,
    },
    CancelSubmission,
    ClearIntent,
    ToggleFocus,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            self.dispatch(action);
        }
    }
}

pub enum AppCommand {
    DispatchScan(ScanParams),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitScan { .. }
        | AppAction::ScanSettled { .. }
        | AppAction::CancelSubmission => submission::handle_submission_action(app, action),

        AppAction::ClearIntent | AppAction::ToggleFocus => input::handle_input_action(app, action),
    }
}
