use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    file_list_state::FileListEntry,
    shell_state::{DropZoneState, FocusPane, Modal, ShellState, CLEAR_CONFIRM_TEXT},
};

use super::{
    chat_rendering::{build_chat_lines, visible_window},
    styles,
    text_input::{panel_block, render_single_line, render_textarea},
};

const EMPTY_FILE_LIST_TEXT: &str = "No documents yet. Press u to upload files.";
const DROP_ZONE_TITLE: &str = "Drop files here";

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [chat_column, documents_column] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .areas(content_area);

    // 3 lines for the input: border + text + border.
    let [chat_log_area, chat_input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(chat_column);

    let [file_list_area, ingest_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(5)])
        .areas(documents_column);

    let focus = state.focus();
    render_chat_log(frame, chat_log_area, state);
    render_single_line(
        frame,
        chat_input_area,
        "Message",
        state.chat_input(),
        focus == FocusPane::ChatInput && state.modal().is_none(),
    );
    render_file_list(frame, file_list_area, state);
    render_textarea(
        frame,
        ingest_area,
        state.ingest_input(),
        focus == FocusPane::IngestInput && state.modal().is_none(),
        state.ingest_button_label(),
        state.ingest_enabled() && !state.ingest_input().trimmed().is_empty(),
    );

    frame.render_widget(Paragraph::new(status_line(state)), status_area);

    if let Some(modal) = state.modal() {
        render_modal(frame, modal, state);
    }
}

fn render_chat_log(frame: &mut Frame<'_>, area: Rect, state: &mut ShellState) {
    let block = Block::default()
        .title("Chat")
        .borders(Borders::ALL)
        .border_style(styles::inactive_panel_border_style());
    let inner = block.inner(area);

    let lines = build_chat_lines(state.chat_log().messages(), usize::from(inner.width));
    let height = usize::from(inner.height);
    let (first_line, scroll_back) =
        visible_window(lines.len(), height, state.chat_log().scroll_back());
    state.chat_log_mut().clamp_scroll(scroll_back);

    let visible: Vec<Line<'static>> = lines.into_iter().skip(first_line).take(height).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn render_file_list(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let focused = state.focus() == FocusPane::FileList && state.modal().is_none();
    let file_list = state.file_list();

    let block = match state.drop_zone() {
        DropZoneState::DragOver => Block::default()
            .title(DROP_ZONE_TITLE)
            .borders(Borders::ALL)
            .border_style(styles::drop_zone_active_style()),
        DropZoneState::Idle => panel_block(&format!("Documents ({})", file_list.entries().len()), focused),
    };

    if file_list.is_empty() {
        let message = Paragraph::new(EMPTY_FILE_LIST_TEXT)
            .style(styles::input_placeholder_style())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem<'static>> = file_list.entries().iter().map(file_list_item).collect();
    let list = List::new(items).block(block).highlight_style(if focused {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
    });

    let mut list_state = ListState::default();
    list_state.select(file_list.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn file_list_item(entry: &FileListEntry) -> ListItem<'static> {
    ListItem::new(file_list_line(entry))
}

fn file_list_line(entry: &FileListEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<9}", entry.status.as_label()),
            styles::file_status_style(entry.status),
        ),
        Span::raw(" "),
        Span::styled(entry.name.clone(), styles::file_name_style()),
    ])
}

fn status_line(state: &ShellState) -> Line<'static> {
    let health = state.server_health();
    let hint = match (state.modal(), state.focus()) {
        (Some(Modal::ConfirmClear), _) => "y: clear | n/Esc: cancel",
        (Some(Modal::UploadPrompt), _) => "paste or drop paths | Enter: upload | Esc: cancel",
        (Some(Modal::Notice(_)), _) => "any key: close",
        (None, FocusPane::ChatInput) => "Enter: send | Tab: next pane | PgUp/PgDn: scroll | Ctrl+Q: quit",
        (None, FocusPane::FileList) => "u: upload | x: clear all | j/k: select | Tab: next pane",
        (None, FocusPane::IngestInput) => "Ctrl+S: ingest | Enter: newline | Tab: next pane",
    };

    let mut spans = vec![
        Span::styled("server: ", styles::status_hint_style()),
        Span::styled(health.as_label(), styles::server_health_style(health)),
    ];

    if state.in_flight().any_busy() {
        spans.push(Span::styled(" | working...", styles::status_note_style()));
    }

    spans.push(Span::styled(format!(" | {hint}"), styles::status_hint_style()));

    if let Some(note) = state.status_note() {
        spans.push(Span::styled(format!(" | {note}"), styles::status_note_style()));
    }

    Line::from(spans)
}

fn render_modal(frame: &mut Frame<'_>, modal: &Modal, state: &ShellState) {
    let area = centered_rect(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::modal_border_style());

    match modal {
        Modal::ConfirmClear => {
            let body = vec![
                Line::from(CLEAR_CONFIRM_TEXT),
                Line::default(),
                Line::from(Span::styled("[y] Clear   [n] Cancel", styles::status_hint_style())),
            ];
            frame.render_widget(
                Paragraph::new(body)
                    .wrap(Wrap { trim: true })
                    .block(block.title("Clear knowledge base")),
                area,
            );
        }
        Modal::Notice(text) => {
            let body = vec![
                Line::from(text.clone()),
                Line::default(),
                Line::from(Span::styled("Press any key to continue", styles::status_hint_style())),
            ];
            frame.render_widget(
                Paragraph::new(body)
                    .wrap(Wrap { trim: true })
                    .block(block.title("Notice")),
                area,
            );
        }
        Modal::UploadPrompt => {
            let block = block.title("Upload files");
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let [help_area, input_area] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(3)])
                .areas(inner);

            frame.render_widget(
                Paragraph::new("Drop files onto the terminal or paste their paths.")
                    .wrap(Wrap { trim: true }),
                help_area,
            );
            render_single_line(frame, input_area, "Paths", state.upload_prompt(), true);
        }
    }
}

/// Rect of at most `width_percent` x `height` rows centered in `area`.
fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
