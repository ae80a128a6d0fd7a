//! JSON bodies exchanged with the knowledge base service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::usecases::{ask::ChatAnswer, contracts::DocumentReceipt};

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct IngestTextRequest<'a> {
    pub text: &'a str,
    pub filename: &'a str,
}

/// `/chat` reply. The error envelope `{"error": {...}}` decodes to an empty
/// reply.
#[derive(Debug, Default)]
pub(super) struct ChatResponse {
    pub answer: Option<String>,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SourceRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl ChatResponse {
    /// Reads `answer` and each source on its own, so one malformed source
    /// does not discard the answer.
    pub fn from_value(value: &Value) -> Self {
        let answer = value
            .get("answer")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let sources = value
            .get("sources")
            .and_then(Value::as_array)
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(|source| SourceRef::deserialize(source).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self { answer, sources }
    }
}

impl From<ChatResponse> for ChatAnswer {
    fn from(response: ChatResponse) -> Self {
        Self {
            answer: response.answer,
            source_ids: response
                .sources
                .into_iter()
                .filter_map(|source| source.id)
                .collect(),
        }
    }
}

/// Acknowledgement from `/upload` and `/ingest-text`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AckResponse {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub chunks_ingested: Option<u64>,
}

impl From<AckResponse> for DocumentReceipt {
    fn from(response: AckResponse) -> Self {
        Self {
            filename: response.filename,
            chunks_ingested: response.chunks_ingested,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Decodes `value` as `T`, falling back to `T::default()` for shapes that do
/// not match (a JSON array, a bare string, wrong field types).
pub(super) fn lenient<T>(value: Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    serde_json::from_value(value).unwrap_or_default()
}
