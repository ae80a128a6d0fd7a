//! Use case for wiping every document from the knowledge base.

use std::io;

use crate::domain::shell_state::CLEAR_CONFIRM_TEXT;

use super::contracts::GatewayError;

pub trait KnowledgeBaseCleaner {
    fn clear_documents(&self) -> Result<(), GatewayError>;
}

impl<T: KnowledgeBaseCleaner + ?Sized> KnowledgeBaseCleaner for &T {
    fn clear_documents(&self) -> Result<(), GatewayError> {
        (*self).clear_documents()
    }
}

/// Asks the operator a yes/no question.
pub trait ConfirmPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

pub struct StdConfirmPrompt;

impl ConfirmPrompt for StdConfirmPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        use std::io::Write;

        print!("{question} [y/N] ");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(false);
        }

        Ok(is_affirmative(&line))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearError {
    Unreachable,
    Rejected { status: u16 },
    InvalidResponse,
}

pub fn clear_knowledge_base(cleaner: &dyn KnowledgeBaseCleaner) -> Result<(), ClearError> {
    cleaner.clear_documents().map_err(|error| {
        tracing::warn!(error = %error, "knowledge base clear failed");
        match error {
            GatewayError::Unreachable(_) => ClearError::Unreachable,
            GatewayError::Rejected { status } => ClearError::Rejected { status },
            GatewayError::InvalidResponse(_) => ClearError::InvalidResponse,
        }
    })
}

/// Clears the knowledge base only after the operator confirmed.
pub fn confirm_and_clear(
    prompt: &mut dyn ConfirmPrompt,
    cleaner: &dyn KnowledgeBaseCleaner,
) -> io::Result<Result<ClearOutcome, ClearError>> {
    if !prompt.confirm(CLEAR_CONFIRM_TEXT)? {
        tracing::info!("knowledge base clear declined");
        return Ok(Ok(ClearOutcome::Declined));
    }

    Ok(clear_knowledge_base(cleaner).map(|()| ClearOutcome::Cleared))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
