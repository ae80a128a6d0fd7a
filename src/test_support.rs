use std::sync::{Mutex, MutexGuard};

use crate::usecases::{
    ask::{ChatAnswer, ChatBackend},
    clear_knowledge_base::KnowledgeBaseCleaner,
    contracts::{DocumentReceipt, GatewayError},
    health::HealthProbe,
    ingest_text::TextIngestor,
    upload_files::DocumentUploader,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

/// In-memory gateway that either answers everything or fails everything.
#[derive(Debug)]
pub struct StubGateway {
    failure: Option<GatewayError>,
    answer: String,
    source_ids: Vec<String>,
    uploaded: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn answering(answer: &str, source_ids: &[&str]) -> Self {
        Self {
            failure: None,
            answer: answer.to_owned(),
            source_ids: source_ids.iter().map(|id| (*id).to_owned()).collect(),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            failure: Some(GatewayError::Unreachable("connection refused".to_owned())),
            answer: String::new(),
            source_ids: Vec::new(),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploaded.lock().expect("upload log lock").clone()
    }

    fn outcome<T>(&self, value: T) -> Result<T, GatewayError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(value),
        }
    }
}

impl ChatBackend for StubGateway {
    fn chat(&self, _message: &str) -> Result<ChatAnswer, GatewayError> {
        self.outcome(ChatAnswer {
            answer: Some(self.answer.clone()),
            source_ids: self.source_ids.clone(),
        })
    }
}

impl DocumentUploader for StubGateway {
    fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<DocumentReceipt, GatewayError> {
        self.outcome(())?;
        self.uploaded
            .lock()
            .expect("upload log lock")
            .push(file_name.to_owned());
        Ok(DocumentReceipt {
            filename: Some(file_name.to_owned()),
            chunks_ingested: Some(1),
        })
    }
}

impl TextIngestor for StubGateway {
    fn ingest_text(&self, _text: &str, filename: &str) -> Result<DocumentReceipt, GatewayError> {
        self.outcome(DocumentReceipt {
            filename: Some(filename.to_owned()),
            chunks_ingested: Some(1),
        })
    }
}

impl KnowledgeBaseCleaner for StubGateway {
    fn clear_documents(&self) -> Result<(), GatewayError> {
        self.outcome(())
    }
}

impl HealthProbe for StubGateway {
    fn health(&self) -> Result<String, GatewayError> {
        self.outcome("healthy".to_owned())
    }
}
