//! Use case for asking the knowledge base a question.

use crate::domain::chat_message::{ChatReply, SourceTag};

use super::contracts::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskCommand {
    pub message: String,
}

/// Raw chat payload as the backend returned it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatAnswer {
    pub answer: Option<String>,
    pub source_ids: Vec<String>,
}

pub trait ChatBackend {
    /// Sends one chat message.
    ///
    /// Implementations return `Ok` whenever the backend produced a JSON body,
    /// whatever its status; the caller decides based on `answer`.
    fn chat(&self, message: &str) -> Result<ChatAnswer, GatewayError>;
}

impl<T: ChatBackend + ?Sized> ChatBackend for &T {
    fn chat(&self, message: &str) -> Result<ChatAnswer, GatewayError> {
        (*self).chat(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// Message text is empty after trimming whitespace.
    EmptyMessage,
}

/// Sends a question and folds every backend outcome into a displayable reply.
///
/// # Errors
/// Returns `AskError::EmptyMessage` if text is empty/whitespace; no call is made.
pub fn ask(backend: &dyn ChatBackend, command: AskCommand) -> Result<ChatReply, AskError> {
    let message = command.message.trim();
    if message.is_empty() {
        return Err(AskError::EmptyMessage);
    }

    let reply = match backend.chat(message) {
        Ok(answer) => reply_from_answer(answer),
        Err(error) => {
            tracing::warn!(error = %error, "chat request failed");
            reply_from_error(&error)
        }
    };

    Ok(reply)
}

fn reply_from_answer(answer: ChatAnswer) -> ChatReply {
    match answer.answer {
        Some(text) if !text.is_empty() => ChatReply::Answer {
            text,
            sources: answer.source_ids.into_iter().map(SourceTag::new).collect(),
        },
        _ => {
            tracing::warn!("chat response carried no answer");
            ChatReply::ApplicationFailure
        }
    }
}

fn reply_from_error(error: &GatewayError) -> ChatReply {
    match error {
        GatewayError::Unreachable(_) | GatewayError::InvalidResponse(_) => {
            ChatReply::ConnectionFailure
        }
        GatewayError::Rejected { .. } => ChatReply::ApplicationFailure,
    }
}
