//! Text input rendering: the single-line chat prompt and the ingest textarea.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::domain::text_input_state::TextInputState;

use super::styles;

const PROMPT_SYMBOL: &str = "> ";
const CHAT_PLACEHOLDER: &str = "Ask a question about your documents...";
const INGEST_PLACEHOLDER: &str = "Paste text to add to the knowledge base...";

/// Renders a one-line input, scrolled horizontally to keep the cursor visible.
pub fn render_single_line(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    input: &TextInputState,
    focused: bool,
) {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let text_width = inner_width.saturating_sub(PROMPT_SYMBOL.len());
    let (visible, cursor_offset) = visible_segment(input.text(), input.cursor_position(), text_width);

    let line = if input.is_empty() && !focused {
        Line::from(vec![
            Span::styled(PROMPT_SYMBOL, styles::input_prompt_style()),
            Span::styled(CHAT_PLACEHOLDER, styles::input_placeholder_style()),
        ])
    } else {
        Line::from(vec![
            Span::styled(PROMPT_SYMBOL, styles::input_prompt_style()),
            Span::styled(visible, styles::input_text_style()),
        ])
    };

    let paragraph = Paragraph::new(line).block(panel_block(title, focused));
    frame.render_widget(paragraph, area);

    if focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(cursor_offset.min(usize::from(u16::MAX)) as u16);
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

/// Renders the multi-line ingest textarea with its action button on the last row.
pub fn render_textarea(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &TextInputState,
    focused: bool,
    button_label: &str,
    button_enabled: bool,
) {
    let block = panel_block("Add Text", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let text_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let button_area = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    let (line_index, column) = input.cursor_line_and_column();
    let first_row = line_index.saturating_sub(usize::from(text_area.height).saturating_sub(1));

    let lines: Vec<Line<'static>> = if input.is_empty() && !focused {
        vec![Line::from(Span::styled(
            INGEST_PLACEHOLDER,
            styles::input_placeholder_style(),
        ))]
    } else {
        input
            .text()
            .split('\n')
            .skip(first_row)
            .take(usize::from(text_area.height))
            .map(|row| Line::from(Span::styled(row.to_owned(), styles::input_text_style())))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), text_area);

    frame.render_widget(
        Paragraph::new(button_line(button_label, button_enabled)).alignment(Alignment::Right),
        button_area,
    );

    if focused && text_area.height > 0 {
        let current_line = input.text().split('\n').nth(line_index).unwrap_or_default();
        let cursor_x = display_width(current_line.chars().take(column));
        let cursor_x = cursor_x.min(usize::from(text_area.width.saturating_sub(1)));
        frame.set_cursor_position((
            text_area.x.saturating_add(cursor_x as u16),
            text_area
                .y
                .saturating_add((line_index - first_row).min(usize::from(u16::MAX)) as u16),
        ));
    }
}

pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    Block::default()
        .title(title.to_owned())
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn button_line(label: &str, enabled: bool) -> Line<'static> {
    let style: Style = if enabled {
        styles::button_enabled_style()
    } else {
        styles::button_disabled_style()
    };
    let hint = if enabled { " Ctrl+S" } else { "" };

    Line::from(vec![
        Span::styled(format!("[ {label} ]"), style),
        Span::styled(hint, styles::status_hint_style()),
    ])
}

/// Returns the slice of `text` that fits in `width` columns with the cursor
/// visible, plus the cursor's column inside that slice.
fn visible_segment(text: &str, cursor: usize, width: usize) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let width = width.max(1);

    // Leave one column for the cursor itself.
    let mut start = cursor;
    let mut used = 0;
    while start > 0 {
        let ch_width = chars[start - 1].width().unwrap_or(0);
        if used + ch_width >= width {
            break;
        }
        used += ch_width;
        start -= 1;
    }

    let mut visible = String::new();
    let mut visible_width = 0;
    for ch in &chars[start..] {
        let ch_width = ch.width().unwrap_or(0);
        if visible_width + ch_width > width {
            break;
        }
        visible.push(*ch);
        visible_width += ch_width;
    }

    (visible, used)
}

fn display_width(chars: impl Iterator<Item = char>) -> usize {
    chars.map(|ch| ch.width().unwrap_or(0)).sum()
}
