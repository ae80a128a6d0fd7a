/// Placeholder text shown while the assistant reply is pending.
pub const LOADING_TEXT: &str = "Thinking...";

/// Fallback shown when the backend answered without an `answer` field.
pub const APPLICATION_FAILURE_TEXT: &str = "Sorry, I encountered an error.";

/// Fallback shown when the request never produced a usable response.
pub const CONNECTION_FAILURE_TEXT: &str = "Error connecting to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// Identifier of a document that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub id: String,
}

impl SourceTag {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub sources: Vec<SourceTag>,
    pub is_loading: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            sources: Vec::new(),
            is_loading: false,
        }
    }

    pub fn assistant(text: impl Into<String>, sources: Vec<SourceTag>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            sources,
            is_loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            role: ChatRole::Assistant,
            text: LOADING_TEXT.to_owned(),
            sources: Vec::new(),
            is_loading: true,
        }
    }

    /// Returns the `Sources: a b` line, or `None` when the message has no sources.
    pub fn sources_line(&self) -> Option<String> {
        if self.sources.is_empty() {
            return None;
        }

        let tags = self
            .sources
            .iter()
            .map(|source| source.id.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(format!("Sources: {tags}"))
    }
}

/// Final outcome of one chat exchange, as it should appear in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Answer {
        text: String,
        sources: Vec<SourceTag>,
    },
    /// The call completed but carried no answer.
    ApplicationFailure,
    /// The call itself failed.
    ConnectionFailure,
}

impl ChatReply {
    pub fn into_message(self) -> ChatMessage {
        match self {
            Self::Answer { text, sources } => ChatMessage::assistant(text, sources),
            Self::ApplicationFailure => ChatMessage::assistant(APPLICATION_FAILURE_TEXT, Vec::new()),
            Self::ConnectionFailure => ChatMessage::assistant(CONNECTION_FAILURE_TEXT, Vec::new()),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }
}
