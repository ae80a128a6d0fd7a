//! Use case for ingesting raw pasted text as a virtual document.

use chrono::{DateTime, Local};

use super::contracts::{DocumentReceipt, GatewayError};

pub trait TextIngestor {
    fn ingest_text(&self, text: &str, filename: &str) -> Result<DocumentReceipt, GatewayError>;
}

impl<T: TextIngestor + ?Sized> TextIngestor for &T {
    fn ingest_text(&self, text: &str, filename: &str) -> Result<DocumentReceipt, GatewayError> {
        (*self).ingest_text(text, filename)
    }
}

/// Text ready to be sent, with its synthetic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedIngest {
    /// Row label, e.g. `Input @ 14:03:27`.
    pub display_name: String,
    /// Name the backend stores the text under, e.g. `manual_input_1700000000000.txt`.
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    Unreachable,
    Rejected { status: u16 },
    InvalidResponse,
}

/// Trims `raw` and derives the synthetic names; `None` when nothing is left.
pub fn prepare_ingest(raw: &str, now: DateTime<Local>) -> Option<PreparedIngest> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    Some(PreparedIngest {
        display_name: format!("Input @ {}", now.format("%H:%M:%S")),
        filename: format!("manual_input_{}.txt", now.timestamp_millis()),
        text: text.to_owned(),
    })
}

pub fn ingest_text(
    ingestor: &dyn TextIngestor,
    prepared: &PreparedIngest,
) -> Result<DocumentReceipt, IngestError> {
    ingestor
        .ingest_text(&prepared.text, &prepared.filename)
        .map_err(|error| {
            tracing::warn!(
                error = %error,
                filename = %prepared.filename,
                "text ingestion failed"
            );
            match error {
                GatewayError::Unreachable(_) => IngestError::Unreachable,
                GatewayError::Rejected { status } => IngestError::Rejected { status },
                GatewayError::InvalidResponse(_) => IngestError::InvalidResponse,
            }
        })
}
