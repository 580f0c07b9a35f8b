use crate::core::app::App;
use crate::core::message::SubmissionStatus;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = " • ";

#[derive(Debug, Clone)]
struct FieldVariant {
    text: String,
    width: usize,
}

impl FieldVariant {
    fn new(text: String) -> Self {
        let width = UnicodeWidthStr::width(text.as_str());
        Self { text, width }
    }
}

fn build_variants(label: &str, value: &str) -> Vec<FieldVariant> {
    let mut variants = Vec::new();
    let full_text = format!("{}{}", label, value);
    variants.push(FieldVariant::new(full_text));

    let graphemes: Vec<&str> = UnicodeSegmentation::graphemes(value, true).collect();
    if graphemes.len() > 3 {
        for keep in (3..graphemes.len()).rev() {
            let mut truncated_value = graphemes[..keep].concat();
            truncated_value.push('…');
            variants.push(FieldVariant::new(format!("{}{}", label, truncated_value)));
        }
    }

    variants
}

pub fn status_style(status: SubmissionStatus) -> Style {
    let color = match status {
        SubmissionStatus::Ready => Color::Green,
        SubmissionStatus::Processing => Color::Yellow,
        SubmissionStatus::Error => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Header line: product name, agent address and the submission status.
///
/// The status is always shown in full; the agent address is shortened, then
/// dropped, when the line would not fit in `available_width` columns.
pub fn build_main_title(app: &App, available_width: u16) -> Line<'static> {
    let available_width = available_width as usize;
    let status = app.conversation.status();

    let base_text = format!("NMAP-AI v{}", env!("CARGO_PKG_VERSION"));
    let status_text = format!("SYSTEM_STATUS: {status}");
    let separator_width = UnicodeWidthStr::width(SEPARATOR);
    let fixed_width = UnicodeWidthStr::width(base_text.as_str())
        + separator_width
        + UnicodeWidthStr::width(status_text.as_str());

    let agent_variant = build_variants("Agent: ", &app.session.agent_url)
        .into_iter()
        .find(|variant| fixed_width + separator_width + variant.width <= available_width);

    let mut spans = vec![Span::styled(
        base_text,
        Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(agent) = agent_variant {
        spans.push(Span::raw(SEPARATOR));
        spans.push(Span::styled(agent.text, Style::default().fg(Color::Gray)));
    }
    spans.push(Span::raw(SEPARATOR));
    spans.push(Span::styled(status_text, status_style(status)));
    Line::from(spans)
}
