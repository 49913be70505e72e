//! CLI command implementations

pub mod chat;
pub mod explain;
pub mod refactor;
pub mod suggest;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::ai::ollama::OllamaBackend;
use crate::ai::simulated::SimulatedBackend;
use crate::ai::{AiService, GenerationBackend};
use crate::config::{BackendKind, Config};
use crate::workspace::{
    DirectoryTreeProvider, EditorCollector, FileEditorHost, FileMetadataCollector,
    FileTreeCollector, UserActionLog, UserActionsCollector,
};

/// Build the assistance service for a command invocation, wiring the
/// workspace collectors to the file being worked on and the workspace root
pub fn build_service(
    config: &Config,
    workspace_root: &Path,
    current_file: Option<&Path>,
    actions: UserActionLog,
) -> Result<AiService> {
    let backend: Arc<dyn GenerationBackend> = match config.assistant.backend {
        BackendKind::Simulated => {
            Arc::new(SimulatedBackend::new(config.simulated.clone()))
        }
        BackendKind::Ollama => Arc::new(OllamaBackend::new(
            &config.ollama.endpoint,
            &config.ollama.model,
        )?),
    };

    let service = AiService::new(backend, config.assistant.max_context_items);

    if let Some(file) = current_file {
        let host = Arc::new(FileEditorHost::new(file));
        service.register_collector(Box::new(EditorCollector::new(
            host,
            config.workspace.max_buffer_chars,
        )));
        service.register_collector(Box::new(FileMetadataCollector::new(file)));
    }

    let provider = Arc::new(DirectoryTreeProvider::new(
        workspace_root,
        config.workspace.max_tree_depth,
    ));
    service.register_collector(Box::new(FileTreeCollector::new(provider)));
    service.register_collector(Box::new(UserActionsCollector::new(actions)));

    Ok(service)
}

/// New action log sized per config
pub fn action_log(config: &Config) -> UserActionLog {
    UserActionLog::new(config.assistant.max_recent_actions)
}
