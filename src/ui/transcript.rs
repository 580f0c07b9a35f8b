//! Deterministic rendering of the conversation transcript.
//!
//! Every [`Message`] maps to a fixed block of lines followed by a blank
//! separator. The same lines feed the terminal view and the plain-text output
//! of the `scan` subcommand, so both show identical content.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::core::message::{Message, MessageKind};

pub const EMPTY_TRANSCRIPT_TEXT: &str = "Awaiting Operator Commands...";

const PASSED: &str = "PASSED";
const FAILED: &str = "FAILED";

pub fn build_transcript_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        push_message_lines(&mut lines, message);
        lines.push(Line::from(""));
    }
    lines
}

/// Centered placeholder for a transcript with no entries.
pub fn empty_transcript_line() -> Line<'static> {
    Line::from(Span::styled(
        EMPTY_TRANSCRIPT_TEXT,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

/// Flattens rendered lines to text, dropping styling and alignment.
pub fn plain_lines(lines: &[Line<'_>]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect()
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message) {
    let dim = Style::default().fg(Color::DarkGray);

    match &message.kind {
        MessageKind::User { intent, target } => {
            lines.push(
                Line::from(Span::styled(
                    format!("TARGET: {target}"),
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Right),
            );
            lines.push(
                Line::from(Span::styled(intent.clone(), Style::default().fg(Color::White)))
                    .alignment(Alignment::Right),
            );
            lines.push(
                Line::from(Span::styled(message.timestamp.clone(), dim)).alignment(Alignment::Right),
            );
        }
        MessageKind::TransportError { text } => {
            lines.push(Line::from(Span::styled(
                format!("⚠ {text}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(message.timestamp.clone(), dim)));
        }
        MessageKind::AgentResult {
            error_detail: Some(detail),
            ..
        } => {
            lines.push(Line::from(Span::styled(
                "✗ OUT_OF_CONTEXT",
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(Span::styled(
                detail.clone(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(Span::styled(message.timestamp.clone(), dim)));
        }
        MessageKind::AgentResult {
            category,
            command,
            is_valid,
            error_detail: None,
        } => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("▤ {category} AGENT"),
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", message.timestamp), dim),
            ]));
            lines.push(Line::from(vec![
                Span::styled("$ ", dim),
                Span::styled(command.clone(), Style::default().fg(Color::Green)),
            ]));

            let (mark, verdict, color) = if *is_valid {
                ("✓", PASSED, Color::Green)
            } else {
                ("⚠", FAILED, Color::Red)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{mark} SEMANTIC: {verdict}"), Style::default().fg(color)),
                Span::raw("   "),
                Span::styled("⚡ FUNCTIONAL: VERIFIED", Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(Span::styled(message.timestamp.clone(), dim)));
        }
    }
}
