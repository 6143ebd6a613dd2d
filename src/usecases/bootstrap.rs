use std::{path::Path, sync::mpsc};

use crate::{
    api::{client::HttpBackend, dispatcher::ThreadDispatcher},
    infra::{self, error::AppError, storage_layout::StorageLayout},
    ui::event_source::CrosstermEventSource,
    usecases::{context::AppContext, shell::DefaultShellOrchestrator},
};

const ISSUED_CODE_REVEAL_ENABLED: &str = "AUTH_ISSUED_CODE_REVEAL_ENABLED";

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = infra::config::load(config_path)?;
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let log_guard = infra::logging::init(&config.logging, &layout.log_dir)?;

    if config.auth.reveal_issued_code {
        tracing::warn!(
            code = ISSUED_CODE_REVEAL_ENABLED,
            "one-time codes echoed by the endpoint will be shown on screen"
        );
    }

    Ok(AppContext::new(config, layout, Some(log_guard)))
}

pub struct ComposedShell {
    pub event_source: CrosstermEventSource,
    pub orchestrator: DefaultShellOrchestrator<ThreadDispatcher>,
}

/// Wires the HTTP backend, its worker thread and the key/reply event source
/// into a ready-to-run shell.
pub fn compose_shell(context: &AppContext) -> Result<ComposedShell, AppError> {
    let backend = HttpBackend::new(&context.config.endpoints)?;
    let (reply_tx, reply_rx) = mpsc::channel();
    let dispatcher = ThreadDispatcher::start(backend, reply_tx)?;

    Ok(ComposedShell {
        event_source: CrosstermEventSource::new(reply_rx),
        orchestrator: DefaultShellOrchestrator::new(&context.config.shell_settings(), dispatcher),
    })
}
