//! Ollama generation backend
//!
//! Runs the assistance operations against a local Ollama server.
//! No API key needed - inference happens completely offline.

#![allow(dead_code)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::backend::{AiReply, GenerationBackend, InlineSuggestion, RefactoringSuggestion};
use super::context::ContextItem;

/// Default Ollama server URL
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model for code-related tasks
const DEFAULT_MODEL: &str = "codellama";

// Local inference can be slow
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Generate request (simple completion)
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Generate response
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

mod prompts {
    pub const CHAT: &str = "You are DevSpark AI, the coding assistant built into the DevSpark \
IDE. Answer the developer's message using the attached editor and workspace context. Be direct \
and concise, and use markdown for code blocks.";

    pub const SUGGEST: &str = "You are DevSpark AI, producing inline completion candidates. \
Given the text before the cursor and the attached context, respond with ONLY a JSON array of \
objects with fields \"label\", \"insert_text\" and \"documentation\".";

    pub const EXPLAIN: &str = "You are DevSpark AI, explaining code to a developer. Start with \
a high-level overview, then break down the main components. Explain the why, not just the what.";

    pub const REFACTOR: &str = "You are DevSpark AI, proposing refactorings. Respond with ONLY \
a JSON array of objects with fields \"title\", \"description\", \"before\" and \"after\". \
Preserve existing functionality in every proposal.";
}

/// Generation backend over a local Ollama server
pub struct OllamaBackend {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(endpoint: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    /// Endpoint and model from environment or defaults
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(&url, &model)
    }

    /// Check if Ollama is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String, system: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: Some(false),
            system: Some(system.to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Ollama. Is it running?")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama request failed ({}): {}", status, body);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generate response")?;

        Ok(generated.response)
    }
}

/// Attach the serialized context window to a request body
fn with_context(body: &str, context: &[ContextItem]) -> String {
    if context.is_empty() {
        return body.to_string();
    }
    let serialized =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| "[]".to_string());
    format!("## Context\n```json\n{serialized}\n```\n\n{body}")
}

/// Pull the first JSON array out of a model reply that may wrap it in
/// markdown fences or prose
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    async fn chat(&self, message: &str, context: &[ContextItem]) -> Result<AiReply> {
        let prompt = with_context(message, context);
        let response = self.generate(prompt, prompts::CHAT).await?;
        Ok(AiReply::Text { message: response })
    }

    async fn inline_suggestions(
        &self,
        prefix: &str,
        context: &[ContextItem],
    ) -> Result<Vec<InlineSuggestion>> {
        let prompt = with_context(&format!("Text before cursor:\n{prefix}"), context);
        let raw = self.generate(prompt, prompts::SUGGEST).await?;

        let parsed = extract_json_array(&raw)
            .and_then(|json| serde_json::from_str::<Vec<InlineSuggestion>>(json).ok());
        Ok(parsed.unwrap_or_else(|| {
            vec![InlineSuggestion {
                label: "completion".to_string(),
                insert_text: raw.trim().to_string(),
                documentation: format!("Completion from {}", self.model),
            }]
        }))
    }

    async fn explain(&self, code: &str, context: &[ContextItem]) -> Result<String> {
        let prompt = with_context(&format!("Explain this code:\n```\n{code}\n```"), context);
        self.generate(prompt, prompts::EXPLAIN).await
    }

    async fn refactor(
        &self,
        code: &str,
        context: &[ContextItem],
    ) -> Result<Vec<RefactoringSuggestion>> {
        let prompt = with_context(
            &format!("Propose refactorings for this code:\n```\n{code}\n```"),
            context,
        );
        let raw = self.generate(prompt, prompts::REFACTOR).await?;

        let parsed = extract_json_array(&raw)
            .and_then(|json| serde_json::from_str::<Vec<RefactoringSuggestion>>(json).ok());
        Ok(parsed.unwrap_or_else(|| {
            vec![RefactoringSuggestion {
                title: format!("Suggestion from {}", self.model),
                description: raw.trim().to_string(),
                before: String::new(),
                after: String::new(),
            }]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn backend_creation_defaults() {
        let backend = OllamaBackend::new("http://localhost:11434/", "mistral").unwrap();
        assert_eq!(backend.base_url, "http://localhost:11434");
        assert_eq!(backend.model(), "mistral");
    }

    #[test]
    fn prompt_carries_context_window() {
        let context = vec![ContextItem {
            kind: "editor".to_string(),
            payload: json!({"language": "rust"}),
            timestamp: Utc::now(),
        }];
        let prompt = with_context("hello", &context);
        assert!(prompt.contains("## Context"));
        assert!(prompt.contains("\"editor\""));
        assert!(prompt.ends_with("hello"));
    }

    #[test]
    fn empty_context_leaves_prompt_bare() {
        assert_eq!(with_context("hello", &[]), "hello");
    }

    #[test]
    fn json_array_extracted_from_fenced_reply() {
        let raw = "Here you go:\n```json\n[{\"label\": \"a\", \"insert_text\": \"b\", \"documentation\": \"c\"}]\n```";
        let json = extract_json_array(raw).unwrap();
        let parsed: Vec<InlineSuggestion> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label, "a");
    }
}
