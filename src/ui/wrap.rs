//! Word wrapping for transcript lines.
//!
//! The transcript is wrapped here and drawn by a `Paragraph` without its own
//! wrapping, so the row count used for scroll bounds is exactly the number of
//! rows on screen. Styles and line alignment survive the split.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wraps every line to `width` columns; an empty line stays one empty row.
pub fn wrap_lines(lines: &[Line<'static>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    lines.iter().flat_map(|line| wrap_line(line, width)).collect()
}

fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for (token, style) in tokens(line) {
        let token_width = UnicodeWidthStr::width(token.as_str());

        if token.starts_with(char::is_whitespace) {
            if current_width + token_width > width {
                finish_row(&mut rows, &mut current, line, true);
                current_width = 0;
            } else if current_width > 0 || rows.is_empty() {
                // Leading blanks of continuation rows are dropped.
                current.push(Span::styled(token, style));
                current_width += token_width;
            }
            continue;
        }

        if current_width + token_width <= width {
            current.push(Span::styled(token, style));
            current_width += token_width;
            continue;
        }

        if !current.is_empty() {
            finish_row(&mut rows, &mut current, line, true);
            current_width = 0;
        }

        if token_width <= width {
            current.push(Span::styled(token, style));
            current_width = token_width;
            continue;
        }

        // A single word wider than the viewport is hard broken.
        let mut chunk = String::new();
        let mut chunk_width = 0usize;
        for ch in token.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if chunk_width + ch_width > width && !chunk.is_empty() {
                current.push(Span::styled(std::mem::take(&mut chunk), style));
                finish_row(&mut rows, &mut current, line, false);
                chunk_width = 0;
            }
            chunk.push(ch);
            chunk_width += ch_width;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
        current_width = chunk_width;
    }

    if !current.is_empty() || rows.is_empty() {
        finish_row(&mut rows, &mut current, line, false);
    }
    rows
}

fn finish_row(
    rows: &mut Vec<Line<'static>>,
    current: &mut Vec<Span<'static>>,
    source: &Line<'static>,
    trim_trailing: bool,
) {
    let mut spans = std::mem::take(current);
    if trim_trailing {
        while spans
            .last()
            .is_some_and(|span| span.content.chars().all(char::is_whitespace))
        {
            spans.pop();
        }
    }
    let mut row = Line::from(spans).style(source.style);
    row.alignment = source.alignment;
    rows.push(row);
}

/// Splits spans into runs of whitespace and non-whitespace, keeping styles.
fn tokens(line: &Line<'static>) -> Vec<(String, Style)> {
    let mut tokens = Vec::new();
    for span in &line.spans {
        let mut run = String::new();
        let mut run_is_space = false;
        for ch in span.content.chars() {
            let is_space = ch.is_whitespace();
            if !run.is_empty() && is_space != run_is_space {
                tokens.push((std::mem::take(&mut run), span.style));
            }
            run_is_space = is_space;
            run.push(ch);
        }
        if !run.is_empty() {
            tokens.push((run, span.style));
        }
    }
    tokens
}
