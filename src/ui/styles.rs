//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{events::ServerHealth, file_list_state::FileStatus};

// =============================================================================
// Panel styles
// =============================================================================

/// Border of the focused panel.
pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Border of the file list while the upload prompt is armed.
pub fn drop_zone_active_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

// =============================================================================
// Chat log styles
// =============================================================================

pub fn user_label_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn assistant_label_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for the "Thinking..." placeholder.
pub fn loading_text_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Style for the "Sources:" line under an answer.
pub fn sources_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn button_enabled_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn button_disabled_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// File list and status bar styles
// =============================================================================

/// Badge color for a file row status.
pub fn file_status_style(status: FileStatus) -> Style {
    match status {
        FileStatus::Uploading | FileStatus::Ingesting => Style::default().fg(Color::Yellow),
        FileStatus::Success => Style::default().fg(Color::Green),
        FileStatus::Error => Style::default().fg(Color::Red),
    }
}

pub fn file_name_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn server_health_style(health: ServerHealth) -> Style {
    match health {
        ServerHealth::Unknown => Style::default().fg(Color::DarkGray),
        ServerHealth::Healthy => Style::default().fg(Color::Green),
        ServerHealth::Unreachable => Style::default().fg(Color::Red),
    }
}

pub fn status_hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn status_note_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn modal_border_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}
