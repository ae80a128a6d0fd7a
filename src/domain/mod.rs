//! Domain layer: UI state, entities and their transition rules.

pub mod action_state;
pub mod chat_log_state;
pub mod chat_message;
pub mod events;
pub mod file_list_state;
pub mod shell_state;
pub mod text_input_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
