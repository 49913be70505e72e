//! Context aggregation, request dispatch and generation backends

pub mod backend;
pub mod context;
pub mod ollama;
pub mod service;
pub mod simulated;

pub use backend::{AiReply, GenerationBackend, InlineSuggestion, RefactoringSuggestion};
pub use context::{CollectorRegistry, ContextCollector, ContextItem, ContextWindow};
pub use service::AiService;
