//! Key routing for the operator console.
//!
//! Submission, focus changes, clearing and quitting are resolved here. Transcript
//! scrolling is applied directly to the view state. Any other key is handed to
//! the focused input.

use crate::core::app::{App, AppAction, AppActionDispatcher};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

/// Result of handling a key event
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResult {
    /// Key was handled and should exit the loop
    Exit,
    /// Key was handled
    Handled,
    /// Key was ignored
    NotHandled,
}

pub fn handle_key_event(
    app: &mut App,
    dispatcher: &AppActionDispatcher,
    key: &KeyEvent,
) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyResult::Exit,
        KeyCode::Esc => KeyResult::Exit,
        KeyCode::Enter => match app.submit_action() {
            Some(action) => {
                dispatcher.dispatch(action);
                KeyResult::Handled
            }
            None => KeyResult::NotHandled,
        },
        KeyCode::Char('l') if ctrl => {
            dispatcher.dispatch(AppAction::ClearIntent);
            KeyResult::Handled
        }
        KeyCode::Tab | KeyCode::BackTab => {
            dispatcher.dispatch(AppAction::ToggleFocus);
            KeyResult::Handled
        }
        KeyCode::Up => {
            app.ui.scroll_up(1);
            KeyResult::Handled
        }
        KeyCode::Down => {
            app.ui.scroll_down(1);
            KeyResult::Handled
        }
        KeyCode::PageUp => {
            app.ui.page_up();
            KeyResult::Handled
        }
        KeyCode::PageDown => {
            app.ui.page_down();
            KeyResult::Handled
        }
        KeyCode::End if key.modifiers.is_empty() => {
            app.ui.follow_latest();
            KeyResult::Handled
        }
        // Line breaks would split a single-line field.
        KeyCode::Char('m' | 'j') if ctrl => KeyResult::NotHandled,
        _ => {
            if app.ui.focused_textarea_mut().input(TAInput::from(*key)) {
                KeyResult::Handled
            } else {
                KeyResult::NotHandled
            }
        }
    }
}

/// Pasted text lands in the focused input as a single line.
pub fn handle_paste(app: &mut App, text: &str) {
    let flattened = sanitize_pasted_text(text);
    if !flattened.is_empty() {
        app.ui.focused_textarea_mut().insert_str(flattened);
    }
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\t', " ")
}
