//! Recent user-action context source
//!
//! Keeps a small newest-first ring of the actions the user performed
//! (files opened, commands run) so the assistant can see what they were
//! just doing.

#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ai::context::{kinds, ContextCollector};

/// Priority of the user-actions source in the context window
pub const USER_ACTIONS_PRIORITY: i32 = 3;

/// How many recent actions are retained
pub const DEFAULT_MAX_RECENT_ACTIONS: usize = 10;

/// One recorded user action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    pub action: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

/// Shared, bounded, newest-first log of user actions
#[derive(Clone)]
pub struct UserActionLog {
    inner: Arc<Mutex<VecDeque<UserAction>>>,
    capacity: usize,
}

impl UserActionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Record an action; the oldest entry is dropped past capacity
    pub fn record(&self, action: impl Into<String>, data: Value) {
        let mut actions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        actions.push_front(UserAction {
            action: action.into(),
            data,
            timestamp: Utc::now(),
        });
        while actions.len() > self.capacity {
            actions.pop_back();
        }
    }

    /// Newest-first snapshot
    pub fn snapshot(&self) -> Vec<UserAction> {
        let actions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        actions.iter().cloned().collect()
    }
}

impl Default for UserActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECENT_ACTIONS)
    }
}

/// Collector snapshotting the action log
pub struct UserActionsCollector {
    log: UserActionLog,
}

impl UserActionsCollector {
    pub fn new(log: UserActionLog) -> Self {
        Self { log }
    }
}

impl ContextCollector for UserActionsCollector {
    fn name(&self) -> &str {
        kinds::USER_ACTIONS
    }

    fn priority(&self) -> i32 {
        USER_ACTIONS_PRIORITY
    }

    fn collect(&self) -> Result<Option<Value>> {
        Ok(Some(json!({ "actions": self.log.snapshot() })))
    }
}
