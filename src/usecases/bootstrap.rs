use std::{path::Path, sync::mpsc};

use crate::{
    api::HttpKnowledgeBase,
    infra::{
        self,
        config::{ConfigAdapter, FileConfigAdapter},
        error::AppError,
        storage_layout::StorageLayout,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator, SystemClock},
        dispatcher::BackgroundDispatcher,
        shell::DefaultShellOrchestrator,
    },
};

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(
    config_path: Option<&Path>,
    base_url_override: Option<&str>,
) -> Result<AppContext, AppError> {
    let context = build_context(config_path, base_url_override)?;
    context.layout.ensure_dirs()?;
    infra::logging::init(&context.config.logging, &context.layout.log_file())?;

    tracing::debug!(
        base_url = %context.config.server.base_url,
        config_dir = %context.layout.config_dir.display(),
        "application context ready"
    );

    Ok(context)
}

fn build_context(
    config_path: Option<&Path>,
    base_url_override: Option<&str>,
) -> Result<AppContext, AppError> {
    let config = FileConfigAdapter::new(config_path)
        .with_base_url(base_url_override)
        .load()?;

    Ok(AppContext::new(config, StorageLayout::resolve()?))
}

/// Wires the HTTP gateway, job worker, terminal event source and
/// orchestrator for one interactive session.
pub fn compose_shell(context: &AppContext) -> Result<ShellComposition, AppError> {
    let gateway = HttpKnowledgeBase::new(&context.config.server)?;
    tracing::info!(base_url = %gateway.base_url(), "backend gateway ready");

    let (event_tx, event_rx) = mpsc::channel();
    let dispatcher = BackgroundDispatcher::start(gateway, event_tx).map_err(AppError::Runtime)?;

    let mut orchestrator = DefaultShellOrchestrator::new(dispatcher, SystemClock);
    orchestrator.start();

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(event_rx)),
        orchestrator: Box::new(orchestrator),
    })
}
