use anyhow::Result;
use chrono::{DateTime, Local};
use thiserror::Error;

use crate::domain::{events::AppEvent, shell_state::ShellState};

use super::dispatcher::ApiJob;

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Hands backend jobs to whatever executes them off the render loop.
pub trait JobDispatcher {
    fn dispatch(&mut self, job: ApiJob) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("job worker is no longer running")]
    WorkerGone,
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Failure of a single backend call, as reported by a gateway adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never produced a response (connect, DNS, I/O, timeout).
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    /// The backend answered with a non-success status.
    #[error("backend rejected the request with status {status}")]
    Rejected { status: u16 },
    /// The backend answered but the body was not the expected JSON.
    #[error("backend returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Acknowledgement returned by the upload and ingest endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentReceipt {
    pub filename: Option<String>,
    pub chunks_ingested: Option<u64>,
}

impl DocumentReceipt {
    /// Bracketed suffix for a status line, e.g. ` (stored as a.txt, 4 chunks)`.
    /// The stored name is shown only when it differs from `local_name`.
    pub fn details(&self, local_name: &str) -> String {
        let mut parts = Vec::new();
        if let Some(stored) = self.filename.as_deref().filter(|name| *name != local_name) {
            parts.push(format!("stored as {stored}"));
        }
        if let Some(count) = self.chunks_ingested {
            parts.push(format!("{count} chunks"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!(" ({})", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_details_name_the_stored_file_when_it_differs() {
        let receipt = DocumentReceipt {
            filename: Some("manual_input_1700000000000.txt".to_owned()),
            chunks_ingested: Some(3),
        };

        assert_eq!(
            receipt.details("Input @ 16:20:00"),
            " (stored as manual_input_1700000000000.txt, 3 chunks)"
        );
        assert_eq!(receipt.details("manual_input_1700000000000.txt"), " (3 chunks)");
    }

    #[test]
    fn empty_receipt_has_no_details() {
        assert_eq!(DocumentReceipt::default().details("a.txt"), "");
    }
}
