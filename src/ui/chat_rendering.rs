//! Chat transcript rendering.
//!
//! Messages are flattened into pre-wrapped lines so scrolling can be
//! expressed in terminal rows rather than messages.

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::chat_message::{ChatMessage, ChatRole};

use super::styles;

/// Indent applied to message bodies under the role label.
const BODY_INDENT: &str = "  ";

/// Flattens the transcript into display lines wrapped to `width` columns.
pub fn build_chat_lines(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(BODY_INDENT.len()).max(1);
    let mut lines = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }

        lines.push(role_line(message.role));

        let body_style = if message.is_loading {
            styles::loading_text_style()
        } else {
            styles::message_text_style()
        };

        for row in wrap_text(&message.text, body_width) {
            lines.push(Line::from(vec![
                Span::raw(BODY_INDENT),
                Span::styled(row, body_style),
            ]));
        }

        if let Some(sources) = message.sources_line() {
            for row in wrap_text(&sources, body_width) {
                lines.push(Line::from(vec![
                    Span::raw(BODY_INDENT),
                    Span::styled(row, styles::sources_style()),
                ]));
            }
        }
    }

    lines
}

/// Returns the index of the first visible line and the clamped scroll-back.
pub fn visible_window(total_lines: usize, height: usize, scroll_back: usize) -> (usize, usize) {
    let max_scroll_back = total_lines.saturating_sub(height);
    let scroll_back = scroll_back.min(max_scroll_back);
    (max_scroll_back - scroll_back, scroll_back)
}

fn role_line(role: ChatRole) -> Line<'static> {
    let style = match role {
        ChatRole::User => styles::user_label_style(),
        ChatRole::Assistant => styles::assistant_label_style(),
    };
    Line::from(Span::styled(format!("{}:", role.label()), style))
}

/// Greedy word wrap by display width; words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();

            if row_width > 0 && row_width + 1 + word_width <= width {
                row.push(' ');
                row.push_str(word);
                row_width += 1 + word_width;
                continue;
            }

            if row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            if word_width <= width {
                row.push_str(word);
                row_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if row_width + ch_width > width && row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(ch);
                row_width += ch_width;
            }
        }

        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat_message::{ChatReply, SourceTag, LOADING_TEXT};

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 9),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn splits_words_longer_than_width() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn keeps_explicit_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_text("日本語テキスト", 6), vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn answer_renders_label_body_and_sources() {
        let messages = vec![
            ChatMessage::user("What is the policy?"),
            ChatReply::Answer {
                text: "Two days a week.".to_owned(),
                sources: vec![SourceTag::new("doc1"), SourceTag::new("doc2")],
            }
            .into_message(),
        ];

        let rendered: Vec<String> = build_chat_lines(&messages, 40)
            .iter()
            .map(line_to_string)
            .collect();

        assert_eq!(
            rendered,
            vec![
                "You:",
                "  What is the policy?",
                "",
                "Assistant:",
                "  Two days a week.",
                "  Sources: doc1 doc2",
            ]
        );
    }

    #[test]
    fn loading_placeholder_has_no_sources_line() {
        let rendered: Vec<String> = build_chat_lines(&[ChatMessage::loading()], 40)
            .iter()
            .map(line_to_string)
            .collect();

        assert_eq!(rendered, vec!["Assistant:".to_owned(), format!("  {LOADING_TEXT}")]);
    }

    #[test]
    fn window_follows_bottom_and_clamps_scroll() {
        assert_eq!(visible_window(30, 10, 0), (20, 0));
        assert_eq!(visible_window(30, 10, 5), (15, 5));
        assert_eq!(visible_window(30, 10, 99), (0, 20));
        assert_eq!(visible_window(4, 10, 3), (0, 0));
    }
}
