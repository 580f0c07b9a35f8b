use ratatui::style::{Color, Modifier, Style};
use tui_textarea::{CursorMove, TextArea};

pub const TARGET_PLACEHOLDER: &str = "TARGET_IP";
pub const INTENT_PLACEHOLDER: &str = "ENTER_SCAN_INTENT...";

/// Which of the two operator inputs receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputField {
    Target,
    #[default]
    Intent,
}

impl InputField {
    pub fn other(self) -> Self {
        match self {
            InputField::Target => InputField::Intent,
            InputField::Intent => InputField::Target,
        }
    }
}

pub struct UiState {
    pub focus: InputField,
    /// Lines scrolled from the top of the transcript.
    pub scroll_offset: u16,
    /// Keep the newest entry in view whenever the transcript grows.
    pub auto_scroll: bool,
    /// Transcript viewport rows and scroll bound from the last draw.
    pub transcript_height: u16,
    pub max_scroll_offset: u16,
    pub exit_requested: bool,
    /// Conversation revision the view last drew.
    pub last_seen_revision: u64,
    target: TextArea<'static>,
    intent: TextArea<'static>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        let mut ui = Self {
            focus: InputField::default(),
            scroll_offset: 0,
            auto_scroll: true,
            transcript_height: 0,
            max_scroll_offset: 0,
            exit_requested: false,
            last_seen_revision: 0,
            target: new_input("", TARGET_PLACEHOLDER),
            intent: new_input("", INTENT_PLACEHOLDER),
        };
        ui.configure_textareas();
        ui
    }

    pub fn target_text(&self) -> String {
        self.target.lines().join("\n")
    }

    pub fn intent_text(&self) -> String {
        self.intent.lines().join("\n")
    }

    pub fn set_target_text(&mut self, text: &str) {
        self.target = new_input(text, TARGET_PLACEHOLDER);
        self.configure_textareas();
    }

    pub fn set_intent_text(&mut self, text: &str) {
        self.intent = new_input(text, INTENT_PLACEHOLDER);
        self.configure_textareas();
    }

    /// The target survives a submission so follow-up scans can reuse it.
    pub fn clear_intent(&mut self) {
        self.set_intent_text("");
    }

    pub fn textarea(&self, field: InputField) -> &TextArea<'static> {
        match field {
            InputField::Target => &self.target,
            InputField::Intent => &self.intent,
        }
    }

    pub fn focused_textarea_mut(&mut self) -> &mut TextArea<'static> {
        match self.focus {
            InputField::Target => &mut self.target,
            InputField::Intent => &mut self.intent,
        }
    }

    pub fn focus_field(&mut self, field: InputField) {
        self.focus = field;
        self.configure_textareas();
    }

    pub fn toggle_focus(&mut self) {
        self.focus_field(self.focus.other());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scrolling back to the bottom re-enables following.
    pub fn scroll_down(&mut self, lines: u16) {
        let max_offset = self.max_scroll_offset;
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.transcript_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.transcript_height.max(1));
    }

    pub fn follow_latest(&mut self) {
        self.auto_scroll = true;
    }

    /// Only the focused input shows a cursor.
    fn configure_textareas(&mut self) {
        let focus = self.focus;
        for (field, textarea) in [
            (InputField::Target, &mut self.target),
            (InputField::Intent, &mut self.intent),
        ] {
            textarea.set_cursor_line_style(Style::default());
            if field == focus {
                textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
            } else {
                textarea.set_cursor_style(Style::default());
            }
        }
    }
}

fn new_input(text: &str, placeholder: &str) -> TextArea<'static> {
    let mut textarea = TextArea::from(vec![text.to_string()]);
    textarea.move_cursor(CursorMove::End);
    textarea.set_placeholder_text(placeholder);
    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
    textarea
}
