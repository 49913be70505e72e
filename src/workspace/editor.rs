//! Editor context source
//!
//! The [`EditorHost`] trait is the seam to whatever holds the open buffer
//! (an embedded editor component in the IDE, a file on disk for the CLI).
//! [`EditorCollector`] snapshots the buffer, language, selection and the
//! lines around the cursor for the context window.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ai::context::{kinds, ContextCollector};

/// Priority of the editor source in the context window
pub const EDITOR_PRIORITY: i32 = 10;

/// Buffer snapshots are truncated past this many characters
pub const DEFAULT_MAX_BUFFER_CHARS: usize = 5000;

/// Lines captured on each side of the cursor
const CONTEXT_LINE_SPAN: usize = 5;

/// A cursor selection, 1-based lines and columns
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Selection {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// Source of the currently open buffer
pub trait EditorHost: Send + Sync {
    /// Current buffer text, `None` when no buffer is open
    fn buffer(&self) -> Result<Option<String>>;

    /// Language id of the buffer, when known
    fn language(&self) -> Option<String>;

    /// Current cursor selection, when the host tracks one
    fn selection(&self) -> Option<Selection>;
}

/// A file on disk standing in for the editor buffer
pub struct FileEditorHost {
    path: PathBuf,
}

impl FileEditorHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EditorHost for FileEditorHost {
    fn buffer(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(Some(content))
    }

    fn language(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(language_id)
            .map(str::to_string)
    }

    fn selection(&self) -> Option<Selection> {
        None
    }
}

/// Map a file extension to an editor language id
pub fn language_id(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "rs" => "rust",
        "py" | "pyw" => "python",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "css" => "css",
        "html" | "htm" => "html",
        "json" => "json",
        "toml" => "toml",
        "md" => "markdown",
        _ => "plaintext",
    }
}

/// Lines surrounding a 1-based line number
fn context_lines(content: &str, line: usize, span: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line.saturating_sub(span + 1);
    let end = (line + span).min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}

/// Collector snapshotting the editor host
pub struct EditorCollector {
    host: Arc<dyn EditorHost>,
    max_buffer_chars: usize,
}

impl EditorCollector {
    pub fn new(host: Arc<dyn EditorHost>, max_buffer_chars: usize) -> Self {
        Self {
            host,
            max_buffer_chars,
        }
    }
}

impl ContextCollector for EditorCollector {
    fn name(&self) -> &str {
        kinds::EDITOR
    }

    fn priority(&self) -> i32 {
        EDITOR_PRIORITY
    }

    fn collect(&self) -> Result<Option<Value>> {
        let Some(content) = self.host.buffer()? else {
            return Ok(None);
        };

        let selection = self.host.selection();
        let cursor_line = selection.map(|s| s.start_line).unwrap_or(1);
        let surrounding = context_lines(&content, cursor_line, CONTEXT_LINE_SPAN);

        let truncated = if content.chars().count() > self.max_buffer_chars {
            let cut: String = content.chars().take(self.max_buffer_chars).collect();
            format!("{cut}...")
        } else {
            content
        };

        Ok(Some(json!({
            "content": truncated,
            "language": self.host.language(),
            "selection": selection,
            "context_lines": surrounding,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedHost {
        content: String,
        selection: Option<Selection>,
    }

    impl EditorHost for FixedHost {
        fn buffer(&self) -> Result<Option<String>> {
            Ok(Some(self.content.clone()))
        }

        fn language(&self) -> Option<String> {
            Some("javascript".to_string())
        }

        fn selection(&self) -> Option<Selection> {
            self.selection
        }
    }

    #[test]
    fn collects_buffer_with_language_and_context_lines() {
        let host = Arc::new(FixedHost {
            content: (1..=20).map(|n| format!("line{n}")).collect::<Vec<_>>().join("\n"),
            selection: Some(Selection {
                start_line: 10,
                start_column: 1,
                end_line: 10,
                end_column: 1,
            }),
        });
        let collector = EditorCollector::new(host, DEFAULT_MAX_BUFFER_CHARS);
        let payload = collector.collect().unwrap().unwrap();

        assert_eq!(payload["language"], "javascript");
        let lines = payload["context_lines"].as_str().unwrap();
        assert!(lines.contains("line10"));
        assert!(lines.contains("line5"));
        assert!(lines.contains("line15"));
        assert!(!lines.contains("line16"));
    }

    #[test]
    fn long_buffers_are_truncated_with_ellipsis() {
        let host = Arc::new(FixedHost {
            content: "x".repeat(6000),
            selection: None,
        });
        let collector = EditorCollector::new(host, DEFAULT_MAX_BUFFER_CHARS);
        let payload = collector.collect().unwrap().unwrap();
        let content = payload["content"].as_str().unwrap();
        assert_eq!(content.chars().count(), DEFAULT_MAX_BUFFER_CHARS + 3);
        assert!(content.ends_with("..."));
    }

    #[test]
    fn file_host_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".rs").tempfile().unwrap();
        writeln!(file, "fn main() {{}}").unwrap();

        let host = FileEditorHost::new(file.path());
        assert_eq!(host.language().as_deref(), Some("rust"));
        let buffer = host.buffer().unwrap().unwrap();
        assert!(buffer.contains("fn main"));
    }

    #[test]
    fn missing_file_yields_no_context() {
        let host = Arc::new(FileEditorHost::new("/nonexistent/buffer.js"));
        let collector = EditorCollector::new(host, DEFAULT_MAX_BUFFER_CHARS);
        assert!(collector.collect().unwrap().is_none());
    }
}
