//! Use case layer: application workflows and orchestration.

pub mod ask;
pub mod bootstrap;
pub mod clear_knowledge_base;
pub mod context;
pub mod contracts;
pub mod dispatcher;
pub mod health;
pub mod ingest_text;
pub mod shell;
pub mod upload_files;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
