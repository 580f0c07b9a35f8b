use crate::core::app::{App, InputField};
use crate::ui::title::build_main_title;
use crate::ui::transcript::{build_transcript_lines, empty_transcript_line};
use crate::ui::wrap::wrap_lines;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const INPUT_HINT: &str =
    "Enter: submit • Tab: switch input • Ctrl+L: clear intent • PgUp/PgDn: scroll • Esc: quit";

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(Paragraph::new(build_main_title(app, chunks[0].width)), chunks[0]);
    render_transcript(f, app, chunks[1]);
    render_inputs(f, app, chunks[2]);
    f.render_widget(
        Paragraph::new(INPUT_HINT).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );

    app.ui.last_seen_revision = app.conversation.revision();
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    if app.conversation.is_empty() {
        app.ui.transcript_height = inner.height;
        app.ui.max_scroll_offset = 0;
        app.ui.scroll_offset = 0;
        let padding = inner.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::from(""); padding as usize];
        lines.push(empty_transcript_line());
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let lines = wrap_lines(
        &build_transcript_lines(app.conversation.messages()),
        inner.width,
    );
    let total_rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total_rows.saturating_sub(inner.height);

    app.ui.transcript_height = inner.height;
    app.ui.max_scroll_offset = max_offset;
    if app.ui.auto_scroll {
        app.ui.scroll_offset = max_offset;
    } else {
        app.ui.scroll_offset = app.ui.scroll_offset.min(max_offset);
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.ui.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn render_inputs(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    for (field, title, column) in [
        (InputField::Target, "TARGET", columns[0]),
        (InputField::Intent, "INTENT", columns[1]),
    ] {
        let border_color = if app.ui.focus == field {
            Color::LightBlue
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);
        let inner = block.inner(column);
        f.render_widget(block, column);
        f.render_widget(app.ui.textarea(field), inner);
    }
}
