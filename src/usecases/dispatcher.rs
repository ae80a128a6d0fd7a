//! Background execution of backend jobs.
//!
//! A single worker thread runs jobs strictly in submission order and reports
//! each completion back to the shell loop as an [`AppEvent`].

use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};

use crate::domain::{
    chat_message::ChatReply,
    events::{AppEvent, JobCompletion, ServerHealth},
    file_list_state::EntryId,
};

use super::{
    ask::{ask, AskCommand, AskError, ChatBackend},
    clear_knowledge_base::{clear_knowledge_base, KnowledgeBaseCleaner},
    contracts::{DispatchError, JobDispatcher},
    health::{check_health, HealthProbe},
    ingest_text::{ingest_text, PreparedIngest, TextIngestor},
    upload_files::{upload_file, DocumentUploader, UploadError},
};

const JOB_WORKER_STARTED: &str = "JOB_WORKER_STARTED";
const JOB_WORKER_STOPPED: &str = "JOB_WORKER_STOPPED";
const JOB_WORKER_DETACHED: &str = "JOB_WORKER_DETACHED";
const JOB_COMPLETION_SEND_FAILED: &str = "JOB_COMPLETION_SEND_FAILED";

/// Everything a backend adapter must offer to serve the shell.
pub trait KnowledgeBaseGateway:
    ChatBackend + DocumentUploader + TextIngestor + KnowledgeBaseCleaner + HealthProbe
{
}

impl<T> KnowledgeBaseGateway for T where
    T: ChatBackend + DocumentUploader + TextIngestor + KnowledgeBaseCleaner + HealthProbe
{
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiJob {
    Chat { message: String },
    Upload { entry: EntryId, path: PathBuf },
    Ingest { entry: EntryId, prepared: PreparedIngest },
    Clear,
    Health,
}

impl ApiJob {
    /// Completion to apply when the job could not even be scheduled.
    pub fn failure_completion(&self) -> JobCompletion {
        match self {
            Self::Chat { .. } => JobCompletion::Chat(ChatReply::ConnectionFailure),
            Self::Upload { entry, .. } => JobCompletion::Upload {
                entry: *entry,
                succeeded: false,
            },
            Self::Ingest { entry, .. } => JobCompletion::Ingest {
                entry: *entry,
                succeeded: false,
            },
            Self::Clear => JobCompletion::Clear { succeeded: false },
            Self::Health => JobCompletion::Health(ServerHealth::Unreachable),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Upload { .. } => "upload",
            Self::Ingest { .. } => "ingest",
            Self::Clear => "clear",
            Self::Health => "health",
        }
    }
}

/// Runs one job to completion on the calling thread.
pub fn run_job<G: KnowledgeBaseGateway>(gateway: &G, job: ApiJob) -> JobCompletion {
    match job {
        ApiJob::Chat { message } => match ask(gateway, AskCommand { message }) {
            Ok(reply) => JobCompletion::Chat(reply),
            // The shell never dispatches blank messages; treat as no answer.
            Err(AskError::EmptyMessage) => JobCompletion::Chat(ChatReply::ApplicationFailure),
        },
        ApiJob::Upload { entry, path } => {
            let result = upload_file(gateway, &path);
            if let Err(error) = &result {
                log_upload_failure(&path, error);
            }
            JobCompletion::Upload {
                entry,
                succeeded: result.is_ok(),
            }
        }
        ApiJob::Ingest { entry, prepared } => JobCompletion::Ingest {
            entry,
            succeeded: ingest_text(gateway, &prepared).is_ok(),
        },
        ApiJob::Clear => JobCompletion::Clear {
            succeeded: clear_knowledge_base(gateway).is_ok(),
        },
        ApiJob::Health => JobCompletion::Health(check_health(gateway)),
    }
}

fn log_upload_failure(path: &std::path::Path, error: &UploadError) {
    tracing::warn!(path = %path.display(), error = ?error, "file upload failed");
}

#[derive(Debug)]
pub struct BackgroundDispatcher {
    job_tx: Option<Sender<ApiJob>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundDispatcher {
    pub fn start<G>(gateway: G, event_tx: Sender<AppEvent>) -> std::io::Result<Self>
    where
        G: KnowledgeBaseGateway + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<ApiJob>();
        let worker = thread::Builder::new()
            .name("ragdesk-jobs".to_owned())
            .spawn(move || run_worker(gateway, job_rx, event_tx))?;

        tracing::info!(code = JOB_WORKER_STARTED, "job worker started");

        Ok(Self {
            job_tx: Some(job_tx),
            worker: Some(worker),
        })
    }
}

impl JobDispatcher for BackgroundDispatcher {
    fn dispatch(&mut self, job: ApiJob) -> Result<(), DispatchError> {
        let job_tx = self.job_tx.as_ref().ok_or(DispatchError::WorkerGone)?;
        tracing::debug!(job = job.kind(), "dispatching job");
        job_tx.send(job).map_err(|_| DispatchError::WorkerGone)
    }
}

impl Drop for BackgroundDispatcher {
    fn drop(&mut self) {
        drop(self.job_tx.take());

        if let Some(worker) = self.worker.take() {
            // A request without a timeout may still be running; do not hold
            // up shutdown waiting for it.
            if !worker.is_finished() {
                tracing::debug!(code = JOB_WORKER_DETACHED, "job worker still busy on shutdown");
                return;
            }

            if let Err(error) = worker.join() {
                tracing::warn!(error = ?error, "job worker panicked");
            }
        }
    }
}

fn run_worker<G: KnowledgeBaseGateway>(
    gateway: G,
    job_rx: Receiver<ApiJob>,
    event_tx: Sender<AppEvent>,
) {
    while let Ok(job) = job_rx.recv() {
        let kind = job.kind();
        let completion = run_job(&gateway, job);
        tracing::debug!(job = kind, "job completed");

        if let Err(error) = event_tx.send(AppEvent::JobCompleted(completion)) {
            tracing::warn!(
                code = JOB_COMPLETION_SEND_FAILED,
                error = %error,
                "job completion could not be delivered"
            );
            return;
        }
    }

    tracing::info!(code = JOB_WORKER_STOPPED, "job worker stopped");
}
