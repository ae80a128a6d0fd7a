use std::time::Duration;

use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::runtime::{Builder, Runtime};
use url::Url;

use crate::{
    infra::{config::ServerConfig, error::AppError},
    usecases::{
        ask::{ChatAnswer, ChatBackend},
        clear_knowledge_base::KnowledgeBaseCleaner,
        contracts::{DocumentReceipt, GatewayError},
        health::HealthProbe,
        ingest_text::TextIngestor,
        upload_files::DocumentUploader,
    },
};

use super::wire::{
    lenient, AckResponse, ChatRequest, ChatResponse, HealthResponse, IngestTextRequest,
};

const CHAT_PATH: &str = "chat";
const UPLOAD_PATH: &str = "upload";
const INGEST_TEXT_PATH: &str = "ingest-text";
const CLEAR_PATH: &str = "documents/clear";
const HEALTH_PATH: &str = "health";

/// Blocking facade over the knowledge base HTTP API.
///
/// Owns a current-thread runtime so callers on plain threads can issue
/// requests without an executor of their own.
pub struct HttpKnowledgeBase {
    rt: Runtime,
    http: Client,
    base_url: Url,
}

impl HttpKnowledgeBase {
    pub fn new(config: &ServerConfig) -> Result<Self, AppError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(AppError::HttpClient)?;

        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::Runtime)?;

        tracing::debug!(base_url = %base_url, "http client ready");

        Ok(Self { rt, http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|error| GatewayError::InvalidResponse(format!("bad endpoint {path}: {error}")))
    }

    /// Reads a JSON body regardless of status; used where the body carries
    /// meaning even on failure.
    fn read_json(&self, response: Response) -> Result<(StatusCode, serde_json::Value), GatewayError> {
        let status = response.status();
        let value = self
            .rt
            .block_on(response.json::<serde_json::Value>())
            .map_err(|error| {
                if error.is_decode() {
                    GatewayError::InvalidResponse(error.to_string())
                } else {
                    classify_reqwest_error(&error)
                }
            })?;
        Ok((status, value))
    }

    /// Success means a 2xx status and a JSON body.
    fn read_ack<T>(&self, response: Response) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend rejected request");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
            });
        }

        let (_, value) = self.read_json(response)?;
        Ok(lenient(value))
    }

    fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, GatewayError> {
        self.rt
            .block_on(request.send())
            .map_err(|error| classify_reqwest_error(&error))
    }
}

impl ChatBackend for HttpKnowledgeBase {
    fn chat(&self, message: &str) -> Result<ChatAnswer, GatewayError> {
        let url = self.endpoint(CHAT_PATH)?;
        let response = self.send(self.http.post(url).json(&ChatRequest { message }))?;
        let (status, value) = self.read_json(response)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "chat request returned error status");
        }

        Ok(ChatAnswer::from(ChatResponse::from_value(&value)))
    }
}

impl DocumentUploader for HttpKnowledgeBase {
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentReceipt, GatewayError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_owned()));
        let response = self.send(self.http.post(url).multipart(form))?;

        let ack: AckResponse = self.read_ack(response)?;
        tracing::info!(
            file = file_name,
            chunks = ?ack.chunks_ingested,
            "document uploaded"
        );
        Ok(ack.into())
    }
}

impl TextIngestor for HttpKnowledgeBase {
    fn ingest_text(&self, text: &str, filename: &str) -> Result<DocumentReceipt, GatewayError> {
        let url = self.endpoint(INGEST_TEXT_PATH)?;
        let response = self.send(
            self.http
                .post(url)
                .json(&IngestTextRequest { text, filename }),
        )?;

        let ack: AckResponse = self.read_ack(response)?;
        tracing::info!(file = filename, chunks = ?ack.chunks_ingested, "text ingested");
        Ok(ack.into())
    }
}

impl KnowledgeBaseCleaner for HttpKnowledgeBase {
    fn clear_documents(&self) -> Result<(), GatewayError> {
        let url = self.endpoint(CLEAR_PATH)?;
        let response = self.send(self.http.post(url))?;

        self.read_ack::<serde_json::Value>(response)?;
        tracing::info!("knowledge base cleared");
        Ok(())
    }
}

impl HealthProbe for HttpKnowledgeBase {
    fn health(&self) -> Result<String, GatewayError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self.send(self.http.get(url))?;

        let body: HealthResponse = self.read_ack(response)?;
        Ok(body.status.unwrap_or_default())
    }
}

/// Accepts `http`/`https` URLs and normalizes the path to end with `/` so
/// endpoint joins append instead of replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| AppError::InvalidBaseUrl {
        url: raw.to_owned(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::UnsupportedScheme {
            url: raw.to_owned(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn classify_reqwest_error(error: &reqwest::Error) -> GatewayError {
    let detail = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        format!("request failed: {error}")
    };
    GatewayError::Unreachable(detail)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, body_string_contains, header_exists, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn server_config(base_url: &str) -> ServerConfig {
        ServerConfig {
            base_url: base_url.to_owned(),
            request_timeout_ms: Some(5_000),
        }
    }

    /// Starts a mock server on its own runtime; the adapter under test is
    /// blocking and must be called outside any runtime.
    fn start_server() -> (Runtime, MockServer) {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        let server = rt.block_on(MockServer::start());
        (rt, server)
    }

    fn mount(rt: &Runtime, server: &MockServer, mock: Mock) {
        rt.block_on(mock.mount(server));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = parse_base_url("http://localhost:8000/api").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join(CLEAR_PATH).expect("join").as_str(),
            "http://localhost:8000/api/documents/clear"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(AppError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(AppError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn chat_posts_message_and_reads_answer_with_sources() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/chat"))
                .and(body_json(json!({"message": "What is the policy?"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "answer": "Two days a week.",
                    "sources": [{"id": "doc1", "content": "...", "metadata": {}}]
                })))
                .expect(1),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");
        let answer = client.chat("What is the policy?").expect("chat");

        assert_eq!(answer.answer.as_deref(), Some("Two days a week."));
        assert_eq!(answer.source_ids, vec!["doc1"]);
    }

    #[test]
    fn chat_error_envelope_returns_empty_answer() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST")).and(path("/chat")).respond_with(
                ResponseTemplate::new(500).set_body_json(json!({
                    "error": {"code": "INTERNAL_SERVER_ERROR", "message": "boom"}
                })),
            ),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert_eq!(client.chat("hi"), Ok(ChatAnswer::default()));
    }

    #[test]
    fn chat_non_json_body_is_invalid_response() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/chat"))
                .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert!(matches!(
            client.chat("hi"),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn upload_sends_multipart_file_field() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/upload"))
                .and(header_exists("content-type"))
                .and(body_string_contains("name=\"file\"; filename=\"notes.txt\""))
                .and(body_string_contains("hello knowledge base"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "filename": "notes.txt",
                    "chunks_ingested": 2
                })))
                .expect(1),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");
        let receipt = client
            .upload("notes.txt", b"hello knowledge base".to_vec())
            .expect("upload");

        assert_eq!(
            receipt,
            DocumentReceipt {
                filename: Some("notes.txt".to_owned()),
                chunks_ingested: Some(2),
            }
        );
    }

    #[test]
    fn upload_error_status_is_rejected() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST")).and(path("/upload")).respond_with(
                ResponseTemplate::new(400).set_body_json(json!({
                    "error": {"code": "INVALID_INPUT", "message": "unsupported file type"}
                })),
            ),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert_eq!(
            client.upload("image.png", vec![0, 1, 2]),
            Err(GatewayError::Rejected { status: 400 })
        );
    }

    #[test]
    fn ingest_text_posts_text_and_filename() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/ingest-text"))
                .and(body_json(json!({
                    "text": "Office closes at 6pm.",
                    "filename": "manual_input_1700000000000.txt"
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "filename": "manual_input_1700000000000.txt",
                    "chunks_ingested": 1
                })))
                .expect(1),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");
        let receipt = client
            .ingest_text("Office closes at 6pm.", "manual_input_1700000000000.txt")
            .expect("ingest");

        assert_eq!(receipt.chunks_ingested, Some(1));
    }

    #[test]
    fn ingest_success_without_json_is_invalid_response() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/ingest-text"))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok")),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert!(matches!(
            client.ingest_text("text", "manual_input_1.txt"),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn clear_posts_without_body() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("POST"))
                .and(path("/documents/clear"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"status": "cleared"})),
                )
                .expect(1),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert_eq!(client.clear_documents(), Ok(()));
    }

    #[test]
    fn health_reads_status_field() {
        let (rt, server) = start_server();
        mount(
            &rt,
            &server,
            Mock::given(method("GET"))
                .and(path("/health"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"}))),
        );

        let client = HttpKnowledgeBase::new(&server_config(&server.uri())).expect("client");

        assert_eq!(client.health(), Ok("healthy".to_owned()));
    }

    #[test]
    fn unreachable_server_maps_to_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let client =
            HttpKnowledgeBase::new(&server_config(&format!("http://127.0.0.1:{port}"))).expect("client");

        assert!(matches!(
            client.clear_documents(),
            Err(GatewayError::Unreachable(_))
        ));
    }
}
