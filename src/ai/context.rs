//! Context management for AI operations
//!
//! Gathers snapshots from registered context sources and keeps the most
//! relevant ones in a bounded, priority-ordered window that is attached
//! to every AI request.

#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default cap on the number of items kept in the window
pub const DEFAULT_MAX_CONTEXT_ITEMS: usize = 20;

/// Well-known kinds produced by the built-in collectors
pub mod kinds {
    pub const EDITOR: &str = "editor";
    pub const FILE_STRUCTURE: &str = "file_structure";
    pub const FILE_METADATA: &str = "file_metadata";
    pub const USER_ACTIONS: &str = "user_actions";
}

/// A tagged snapshot of one context source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextItem {
    pub kind: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// A named context source with a static priority
///
/// `collect` returning `Ok(None)` means the source has nothing to report
/// right now; that is not an error.
pub trait ContextCollector: Send {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;
    fn collect(&self) -> Result<Option<Value>>;
}

/// Closure-backed collector for simple sources
pub struct FnCollector<F> {
    name: String,
    priority: i32,
    collect: F,
}

impl<F> FnCollector<F>
where
    F: Fn() -> Result<Option<Value>> + Send,
{
    pub fn new(name: impl Into<String>, priority: i32, collect: F) -> Self {
        Self {
            name: name.into(),
            priority,
            collect,
        }
    }
}

impl<F> ContextCollector for FnCollector<F>
where
    F: Fn() -> Result<Option<Value>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn collect(&self) -> Result<Option<Value>> {
        (self.collect)()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    item: ContextItem,
    priority: i32,
}

/// Bounded snapshot set, at most one item per kind, ordered by
/// descending collector priority
#[derive(Debug)]
pub struct ContextWindow {
    slots: Vec<Slot>,
    max_items: usize,
}

impl ContextWindow {
    pub fn new(max_items: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_items,
        }
    }

    /// Merge a fresh snapshot into the window.
    ///
    /// An existing item of the same kind is replaced in place, keeping its
    /// position. A new kind is appended, the window is re-sorted by
    /// descending priority (stable, so equal priorities keep insertion
    /// order), and lowest-priority items past the cap are evicted from
    /// the tail.
    pub fn update(&mut self, kind: &str, priority: i32, payload: Value) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.item.kind == kind) {
            slot.item.payload = payload;
            slot.item.timestamp = Utc::now();
            return;
        }

        self.slots.push(Slot {
            item: ContextItem {
                kind: kind.to_string(),
                payload,
                timestamp: Utc::now(),
            },
            priority,
        });
        self.slots.sort_by_key(|s| std::cmp::Reverse(s.priority));
        if self.slots.len() > self.max_items {
            for slot in self.slots.split_off(self.max_items) {
                tracing::debug!(
                    kind = %slot.item.kind,
                    priority = slot.priority,
                    "evicted context item"
                );
            }
        }
    }

    /// Snapshot of the current window contents, highest priority first
    pub fn items(&self) -> Vec<ContextItem> {
        self.slots.iter().map(|s| s.item.clone()).collect()
    }

    pub fn get(&self, kind: &str) -> Option<&ContextItem> {
        self.slots
            .iter()
            .find(|s| s.item.kind == kind)
            .map(|s| &s.item)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_ITEMS)
    }
}

/// Registry of context collectors, fixed after startup
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn ContextCollector>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector. Registering a name twice replaces the earlier
    /// collector in place (last registration wins).
    pub fn register(&mut self, collector: Box<dyn ContextCollector>) {
        let name = collector.name().to_string();
        if let Some(existing) = self.collectors.iter_mut().find(|c| c.name() == name) {
            tracing::debug!(collector = %name, "replacing previously registered collector");
            *existing = collector;
        } else {
            self.collectors.push(collector);
        }
    }

    /// Run every collector and merge non-empty snapshots into the window.
    ///
    /// A failing collector is logged and skipped; one bad source degrades
    /// context instead of aborting the whole pass.
    pub fn collect_all(&self, window: &mut ContextWindow) {
        for collector in &self.collectors {
            match collector.collect() {
                Ok(Some(payload)) => {
                    window.update(collector.name(), collector.priority(), payload);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        collector = collector.name(),
                        "context collector failed: {err:#}"
                    );
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }
}
