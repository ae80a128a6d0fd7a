use super::{chat_message::ChatReply, file_list_state::EntryId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    /// Bracketed paste; also how terminals deliver dropped file paths.
    Paste(String),
    JobCompleted(JobCompletion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Result of a backend job, delivered back to the shell loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCompletion {
    Chat(ChatReply),
    Upload { entry: EntryId, succeeded: bool },
    Ingest { entry: EntryId, succeeded: bool },
    Clear { succeeded: bool },
    Health(ServerHealth),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerHealth {
    Unknown,
    Healthy,
    Unreachable,
}

impl ServerHealth {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unreachable => "unreachable",
        }
    }
}
