//! Generation backend seam
//!
//! Defines the typed request/response surface between the dispatcher and
//! whatever produces the actual completions. The dispatcher only depends
//! on this trait, so a real model API, a local runtime, or a deterministic
//! fake can be swapped in without touching the context machinery.

#![allow(dead_code)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::context::ContextItem;

/// An inline completion candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineSuggestion {
    pub label: String,
    pub insert_text: String,
    pub documentation: String,
}

/// A single before/after refactoring proposal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactoringSuggestion {
    pub title: String,
    pub description: String,
    pub before: String,
    pub after: String,
}

/// Typed result of an AI request
///
/// Every dispatcher operation resolves to one of these, including failures:
/// callers never need a try/catch around assistance calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AiReply {
    Text {
        message: String,
    },
    Code {
        message: String,
        language: String,
        code: String,
    },
    Suggestions {
        suggestions: Vec<InlineSuggestion>,
    },
    Explanation {
        explanation: String,
    },
    Refactoring {
        suggestions: Vec<RefactoringSuggestion>,
    },
    Error {
        message: String,
    },
}

impl AiReply {
    pub fn error(message: impl Into<String>) -> Self {
        AiReply::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AiReply::Error { .. })
    }
}

/// Failure modes surfaced by the dispatcher, always converted to an
/// in-band [`AiReply::Error`] before reaching callers
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Already processing a request. Please wait.")]
    Busy,
    #[error("generation failed: {0}")]
    Generation(#[from] anyhow::Error),
}

/// Produces completions for the four assistance operations.
///
/// Implementations receive the request text plus the serialized context
/// window snapshot, highest priority first.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn chat(&self, message: &str, context: &[ContextItem]) -> anyhow::Result<AiReply>;

    async fn inline_suggestions(
        &self,
        prefix: &str,
        context: &[ContextItem],
    ) -> anyhow::Result<Vec<InlineSuggestion>>;

    async fn explain(&self, code: &str, context: &[ContextItem]) -> anyhow::Result<String>;

    async fn refactor(
        &self,
        code: &str,
        context: &[ContextItem],
    ) -> anyhow::Result<Vec<RefactoringSuggestion>>;
}
