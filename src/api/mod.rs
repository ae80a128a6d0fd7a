//! Backend integration layer: HTTP client for the knowledge base service.

mod client;
mod wire;

pub use client::HttpKnowledgeBase;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
