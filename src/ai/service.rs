//! Request dispatcher for AI assistance operations
//!
//! Serializes chat, inline-suggestion, explanation and refactoring requests
//! through a single-slot gate: one request in flight at a time, later
//! callers are rejected immediately rather than queued. Every operation
//! collects the current context window before handing off to the
//! generation backend, and every failure comes back as an in-band
//! [`AiReply::Error`].

use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use uuid::Uuid;

use super::backend::{AiReply, BackendError, GenerationBackend};
use super::context::{CollectorRegistry, ContextCollector, ContextItem, ContextWindow};

struct ContextState {
    registry: CollectorRegistry,
    window: ContextWindow,
}

/// Context-aware assistance service
///
/// Owns the collector registry and context window, gates requests through
/// a single-permit semaphore, and delegates generation to the injected
/// backend.
pub struct AiService {
    state: Mutex<ContextState>,
    gate: Semaphore,
    backend: Arc<dyn GenerationBackend>,
}

impl AiService {
    pub fn new(backend: Arc<dyn GenerationBackend>, max_context_items: usize) -> Self {
        Self {
            state: Mutex::new(ContextState {
                registry: CollectorRegistry::new(),
                window: ContextWindow::new(max_context_items),
            }),
            gate: Semaphore::new(1),
            backend,
        }
    }

    /// Register a context collector. Last registration wins on name clashes.
    pub fn register_collector(&self, collector: Box<dyn ContextCollector>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.registry.register(collector);
    }

    /// Run all collectors and return the merged window snapshot
    pub fn collect_context(&self) -> Vec<ContextItem> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let ContextState { registry, window } = &mut *state;
        registry.collect_all(window);
        window.items()
    }

    /// Current window contents without running the collectors
    pub fn context_items(&self) -> Vec<ContextItem> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.window.items()
    }

    /// Handle a conversational message
    pub async fn process_chat_message(&self, message: &str) -> AiReply {
        self.dispatch("chat", "Error processing request", |context| async move {
            self.backend.chat(message, &context).await
        })
        .await
    }

    /// Produce inline completion candidates for the text before the cursor
    pub async fn inline_suggestions(&self, prefix: &str) -> AiReply {
        self.dispatch("suggest", "Error getting suggestions", |context| async move {
            let suggestions = self.backend.inline_suggestions(prefix, &context).await?;
            Ok(AiReply::Suggestions { suggestions })
        })
        .await
    }

    /// Explain a piece of code
    pub async fn code_explanation(&self, code: &str) -> AiReply {
        self.dispatch("explain", "Error getting explanation", |context| async move {
            let explanation = self.backend.explain(code, &context).await?;
            Ok(AiReply::Explanation { explanation })
        })
        .await
    }

    /// Propose refactorings for a piece of code
    pub async fn refactoring_suggestions(&self, code: &str) -> AiReply {
        self.dispatch(
            "refactor",
            "Error getting refactoring suggestions",
            |context| async move {
                let suggestions = self.backend.refactor(code, &context).await?;
                Ok(AiReply::Refactoring { suggestions })
            },
        )
        .await
    }

    /// Gate → collect → generate → release.
    ///
    /// The permit is held for the lifetime of the call and released on
    /// every exit path, so a backend failure can never leave the service
    /// locked in the processing state.
    async fn dispatch<F, Fut>(&self, op: &str, error_prefix: &str, generate: F) -> AiReply
    where
        F: FnOnce(Vec<ContextItem>) -> Fut,
        Fut: std::future::Future<Output = anyhow::Result<AiReply>>,
    {
        let _permit = match self.gate.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::debug!(op, "request rejected, another request in flight");
                return AiReply::error(BackendError::Busy.to_string());
            }
        };

        let request_id = Uuid::new_v4();
        let context = self.collect_context();
        tracing::debug!(op, %request_id, context_items = context.len(), "dispatching request");

        match generate(context).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(op, %request_id, "generation failed: {err:#}");
                let err = BackendError::Generation(err);
                AiReply::error(format!("{error_prefix}: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::backend::{InlineSuggestion, RefactoringSuggestion};
    use crate::ai::context::FnCollector;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend that parks inside `chat` until released, recording calls
    struct BlockingBackend {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    impl BlockingBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for BlockingBackend {
        async fn chat(&self, message: &str, _context: &[ContextItem]) -> anyhow::Result<AiReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(AiReply::Text {
                message: format!("echo: {message}"),
            })
        }

        async fn inline_suggestions(
            &self,
            _prefix: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<InlineSuggestion>> {
            Ok(Vec::new())
        }

        async fn explain(&self, _code: &str, _context: &[ContextItem]) -> anyhow::Result<String> {
            Ok(String::new())
        }

        async fn refactor(
            &self,
            _code: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<RefactoringSuggestion>> {
            Ok(Vec::new())
        }
    }

    /// Backend that fails a configurable number of times, then succeeds
    struct FlakyBackend {
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl GenerationBackend for FlakyBackend {
        async fn chat(&self, _message: &str, _context: &[ContextItem]) -> anyhow::Result<AiReply> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("model unavailable");
            }
            Ok(AiReply::Text {
                message: "recovered".to_string(),
            })
        }

        async fn inline_suggestions(
            &self,
            _prefix: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<InlineSuggestion>> {
            Ok(Vec::new())
        }

        async fn explain(&self, _code: &str, _context: &[ContextItem]) -> anyhow::Result<String> {
            Ok("fine".to_string())
        }

        async fn refactor(
            &self,
            _code: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<RefactoringSuggestion>> {
            Ok(Vec::new())
        }
    }

    /// Backend that records the context snapshot it was handed
    struct RecordingBackend {
        seen: Mutex<Vec<ContextItem>>,
    }

    #[async_trait]
    impl GenerationBackend for RecordingBackend {
        async fn chat(&self, _message: &str, context: &[ContextItem]) -> anyhow::Result<AiReply> {
            *self.seen.lock().unwrap() = context.to_vec();
            Ok(AiReply::Text {
                message: "ok".to_string(),
            })
        }

        async fn inline_suggestions(
            &self,
            _prefix: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<InlineSuggestion>> {
            Ok(Vec::new())
        }

        async fn explain(&self, _code: &str, _context: &[ContextItem]) -> anyhow::Result<String> {
            Ok(String::new())
        }

        async fn refactor(
            &self,
            _code: &str,
            _context: &[ContextItem],
        ) -> anyhow::Result<Vec<RefactoringSuggestion>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn second_request_rejected_while_first_in_flight() {
        let backend = BlockingBackend::new();
        let service = Arc::new(AiService::new(backend.clone(), 20));

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.process_chat_message("hello").await })
        };
        backend.entered.notified().await;

        let second = service.process_chat_message("hello again").await;
        assert!(second.is_error());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        backend.release.notify_one();
        let first = first.await.unwrap();
        match first {
            AiReply::Text { message } => assert_eq!(message, "echo: hello"),
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn gate_releases_after_backend_failure() {
        let backend = Arc::new(FlakyBackend {
            failures_left: AtomicUsize::new(1),
        });
        let service = AiService::new(backend, 20);

        let first = service.process_chat_message("hi").await;
        match first {
            AiReply::Error { message } => {
                assert!(message.starts_with("Error processing request"), "{message}");
            }
            other => panic!("expected error reply, got {other:?}"),
        }

        let second = service.process_chat_message("hi").await;
        assert!(!second.is_error(), "service stayed busy after a failure");
    }

    #[tokio::test]
    async fn requests_carry_collected_context() {
        let backend = Arc::new(RecordingBackend {
            seen: Mutex::new(Vec::new()),
        });
        let service = AiService::new(backend.clone(), 20);
        service.register_collector(Box::new(FnCollector::new("files", 5, || {
            Ok(Some(json!({"count": 3})))
        })));
        service.register_collector(Box::new(FnCollector::new("editor", 10, || {
            Ok(Some(json!({"lines": "a"})))
        })));

        let reply = service.process_chat_message("hello").await;
        assert!(!reply.is_error());

        let seen = backend.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].kind, "editor");
        assert_eq!(seen[1].kind, "files");
    }

    #[tokio::test]
    async fn window_keeps_last_write_per_kind() {
        let backend = Arc::new(RecordingBackend {
            seen: Mutex::new(Vec::new()),
        });
        let service = AiService::new(backend, 20);
        let counter = Arc::new(AtomicUsize::new(0));
        let shared = counter.clone();
        service.register_collector(Box::new(FnCollector::new("editor", 10, move || {
            let n = shared.fetch_add(1, Ordering::SeqCst);
            Ok(Some(json!({"pass": n})))
        })));

        service.collect_context();
        let items = service.collect_context();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].payload["pass"], 1);
    }
}
