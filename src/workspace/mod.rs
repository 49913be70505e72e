//! Workspace context sources: editor buffer, file tree, file metadata
//! and recent user actions

pub mod actions;
pub mod editor;
pub mod files;

pub use actions::{UserActionLog, UserActionsCollector};
pub use editor::{EditorCollector, EditorHost, FileEditorHost, Selection};
pub use files::{
    DirectoryTreeProvider, FileMetadataCollector, FileTreeCollector, FileTreeProvider, TreeNode,
};
