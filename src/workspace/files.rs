//! File-system context sources
//!
//! A gitignore-aware snapshot of the workspace tree plus metadata for the
//! file currently being edited.

#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::ai::context::{kinds, ContextCollector};

/// Priority of the file-tree source in the context window
pub const FILE_TREE_PRIORITY: i32 = 5;

/// Priority of the file-metadata source in the context window
pub const FILE_METADATA_PRIORITY: i32 = 8;

/// Directory levels walked below the workspace root
pub const DEFAULT_MAX_TREE_DEPTH: usize = 4;

/// One node of the workspace tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub is_directory: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

/// Source of the current workspace listing
pub trait FileTreeProvider: Send + Sync {
    /// Snapshot of the tree, `None` when no workspace is open
    fn tree(&self) -> Result<Option<TreeNode>>;
}

/// Walks a directory on disk, honoring .gitignore and skipping dotfiles
pub struct DirectoryTreeProvider {
    root: PathBuf,
    max_depth: usize,
}

impl DirectoryTreeProvider {
    pub fn new(root: impl Into<PathBuf>, max_depth: usize) -> Self {
        Self {
            root: root.into(),
            max_depth,
        }
    }

    fn walk(
        &self,
        dir: &Path,
        matcher: &Gitignore,
        depth: usize,
    ) -> Result<Vec<TreeNode>> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.file_name());

        let mut nodes = Vec::new();
        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = path.is_dir();
            if matcher.matched(&path, is_dir).is_ignore() {
                continue;
            }

            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();
            let children = if is_dir && depth < self.max_depth {
                Some(self.walk(&path, matcher, depth + 1)?)
            } else if is_dir {
                Some(Vec::new())
            } else {
                None
            };

            nodes.push(TreeNode {
                name,
                is_directory: is_dir,
                path: relative,
                children,
            });
        }

        // Directories first, then files, both alphabetical
        nodes.sort_by_key(|n| (!n.is_directory, n.name.clone()));
        Ok(nodes)
    }
}

impl FileTreeProvider for DirectoryTreeProvider {
    fn tree(&self) -> Result<Option<TreeNode>> {
        if !self.root.is_dir() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        builder.add(self.root.join(".gitignore"));
        let matcher = builder.build().unwrap_or_else(|_| Gitignore::empty());

        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());

        Ok(Some(TreeNode {
            name,
            is_directory: true,
            path: String::new(),
            children: Some(self.walk(&self.root, &matcher, 1)?),
        }))
    }
}

/// Collector snapshotting the workspace tree
pub struct FileTreeCollector {
    provider: Arc<dyn FileTreeProvider>,
}

impl FileTreeCollector {
    pub fn new(provider: Arc<dyn FileTreeProvider>) -> Self {
        Self { provider }
    }
}

impl ContextCollector for FileTreeCollector {
    fn name(&self) -> &str {
        kinds::FILE_STRUCTURE
    }

    fn priority(&self) -> i32 {
        FILE_TREE_PRIORITY
    }

    fn collect(&self) -> Result<Option<Value>> {
        let Some(tree) = self.provider.tree()? else {
            return Ok(None);
        };
        Ok(Some(json!({ "structure": tree })))
    }
}

/// Collector snapshotting metadata of the file being edited
pub struct FileMetadataCollector {
    path: PathBuf,
}

impl FileMetadataCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContextCollector for FileMetadataCollector {
    fn name(&self) -> &str {
        kinds::FILE_METADATA
    }

    fn priority(&self) -> i32 {
        FILE_METADATA_PRIORITY
    }

    fn collect(&self) -> Result<Option<Value>> {
        let Some(file_name) = self.path.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            return Ok(None);
        };
        if !self.path.exists() {
            return Ok(None);
        }

        let file_type = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        let last_modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Some(json!({
            "file_name": file_name,
            "file_type": file_type,
            "last_modified": last_modified,
        })))
    }
}
