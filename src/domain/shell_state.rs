use super::{
    action_state::{ActionKind, InFlightActions},
    chat_log_state::ChatLogState,
    events::ServerHealth,
    file_list_state::FileListState,
    text_input_state::TextInputState,
};

pub const CLEAR_CONFIRM_TEXT: &str =
    "Are you sure you want to clear the entire knowledge base? This action cannot be undone.";
pub const CLEAR_SUCCESS_TEXT: &str = "Knowledge base cleared successfully.";
pub const CLEAR_FAILURE_TEXT: &str = "Error clearing the database.";

const INGEST_IDLE_LABEL: &str = "Ingest Text";
const INGEST_BUSY_LABEL: &str = "Ingesting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPane {
    #[default]
    ChatInput,
    IngestInput,
    FileList,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            Self::ChatInput => Self::IngestInput,
            Self::IngestInput => Self::FileList,
            Self::FileList => Self::ChatInput,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::ChatInput => Self::FileList,
            Self::IngestInput => Self::ChatInput,
            Self::FileList => Self::IngestInput,
        }
    }
}

/// Overlay that captures all keys while open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ConfirmClear,
    UploadPrompt,
    Notice(String),
}

/// Visual state of the file drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropZoneState {
    #[default]
    Idle,
    DragOver,
}

/// All UI state, constructed once at startup and owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    focus: FocusPane,
    chat_log: ChatLogState,
    chat_input: TextInputState,
    ingest_input: TextInputState,
    upload_prompt: TextInputState,
    file_list: FileListState,
    in_flight: InFlightActions,
    drop_zone: DropZoneState,
    modal: Option<Modal>,
    server_health: ServerHealth,
    status_note: Option<String>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            focus: FocusPane::default(),
            chat_log: ChatLogState::default(),
            chat_input: TextInputState::default(),
            ingest_input: TextInputState::default(),
            upload_prompt: TextInputState::default(),
            file_list: FileListState::default(),
            in_flight: InFlightActions::default(),
            drop_zone: DropZoneState::default(),
            modal: None,
            server_health: ServerHealth::Unknown,
            status_note: None,
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn focus(&self) -> FocusPane {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FocusPane) {
        self.focus = focus;
    }

    pub fn chat_log(&self) -> &ChatLogState {
        &self.chat_log
    }

    pub fn chat_log_mut(&mut self) -> &mut ChatLogState {
        &mut self.chat_log
    }

    pub fn chat_input(&self) -> &TextInputState {
        &self.chat_input
    }

    pub fn chat_input_mut(&mut self) -> &mut TextInputState {
        &mut self.chat_input
    }

    pub fn ingest_input(&self) -> &TextInputState {
        &self.ingest_input
    }

    pub fn ingest_input_mut(&mut self) -> &mut TextInputState {
        &mut self.ingest_input
    }

    pub fn upload_prompt(&self) -> &TextInputState {
        &self.upload_prompt
    }

    pub fn upload_prompt_mut(&mut self) -> &mut TextInputState {
        &mut self.upload_prompt
    }

    pub fn file_list(&self) -> &FileListState {
        &self.file_list
    }

    pub fn file_list_mut(&mut self) -> &mut FileListState {
        &mut self.file_list
    }

    pub fn in_flight(&self) -> &InFlightActions {
        &self.in_flight
    }

    pub fn in_flight_mut(&mut self) -> &mut InFlightActions {
        &mut self.in_flight
    }

    pub fn drop_zone(&self) -> DropZoneState {
        self.drop_zone
    }

    pub fn set_drop_zone(&mut self, drop_zone: DropZoneState) {
        self.drop_zone = drop_zone;
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) -> Option<Modal> {
        self.modal.take()
    }

    pub fn server_health(&self) -> ServerHealth {
        self.server_health
    }

    pub fn set_server_health(&mut self, health: ServerHealth) {
        self.server_health = health;
    }

    pub fn status_note(&self) -> Option<&str> {
        self.status_note.as_deref()
    }

    pub fn set_status_note(&mut self, note: impl Into<String>) {
        self.status_note = Some(note.into());
    }

    pub fn clear_status_note(&mut self) {
        self.status_note = None;
    }

    pub fn ingest_enabled(&self) -> bool {
        !self.in_flight.is_busy(ActionKind::Ingest)
    }

    pub fn ingest_button_label(&self) -> &'static str {
        if self.ingest_enabled() {
            INGEST_IDLE_LABEL
        } else {
            INGEST_BUSY_LABEL
        }
    }
}
