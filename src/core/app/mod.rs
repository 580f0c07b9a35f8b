use crate::core::config::ResolvedSettings;
use crate::core::conversation::ConversationStore;

pub mod actions;
pub mod session;
pub mod ui_state;

pub use actions::{apply_actions, AppAction, AppActionDispatcher, AppCommand};
pub use session::SessionContext;
pub use ui_state::{InputField, UiState};

pub struct App {
    pub conversation: ConversationStore,
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    pub fn new(settings: ResolvedSettings) -> Self {
        Self {
            conversation: ConversationStore::new(settings.timestamp_format),
            session: SessionContext::new(settings.agent_url),
            ui: UiState::new(),
        }
    }

    /// Enter submits only with both inputs filled and nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.conversation.status().is_processing()
            && !self.ui.intent_text().is_empty()
            && !self.ui.target_text().is_empty()
    }

    /// Builds the submit action from the current inputs, if allowed.
    pub fn submit_action(&self) -> Option<AppAction> {
        self.can_submit().then(|| AppAction::SubmitScan {
            intent: self.ui.intent_text(),
            target: self.ui.target_text(),
        })
    }

    /// True once the view has drawn every conversation change.
    pub fn is_view_current(&self) -> bool {
        self.ui.last_seen_revision == self.conversation.revision()
    }
}
