//! Per-entity sync results

use crate::entity_key::EntityKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity-level outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Success => write!(f, "success"),
            SyncStatus::Error => write!(f, "error"),
        }
    }
}

/// What happened to a single record inside an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Failed,
    Skipped,
}

/// Remote record identifier; the ERP uses both numeric and string ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

/// A record the remote side failed or skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIssue {
    pub id: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub action: ItemAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ItemIssue {
    /// Create an issue with no name or reason
    pub fn new(id: impl Into<ItemId>, action: ItemAction) -> Self {
        Self {
            id: id.into(),
            name: None,
            action,
            reason: None,
        }
    }

    /// Attach a reason
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Attach a record name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Item-level detail copied from the remote envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDetail {
    #[serde(default)]
    pub items: Vec<ItemIssue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_log: Vec<String>,
}

impl SyncDetail {
    /// Whether there is nothing to report
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.skipped_log.is_empty()
    }
}

/// Outcome of one entity within a job
///
/// Produced exactly once per entity and never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub entity_key: EntityKey,
    pub label: String,
    pub status: SyncStatus,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<SyncDetail>,

    /// Wall-clock time of the remote call
    #[serde(default)]
    pub duration_ms: u64,
}

impl SyncResult {
    /// A successful entity
    pub fn success(entity_key: EntityKey, label: &str, message: &str) -> Self {
        Self {
            entity_key,
            label: label.to_string(),
            status: SyncStatus::Success,
            message: message.to_string(),
            detail: None,
            duration_ms: 0,
        }
    }

    /// A failed entity
    pub fn error(entity_key: EntityKey, label: &str, message: &str) -> Self {
        Self {
            entity_key,
            label: label.to_string(),
            status: SyncStatus::Error,
            message: message.to_string(),
            detail: None,
            duration_ms: 0,
        }
    }

    /// Attach item detail; empty detail is dropped
    pub fn with_detail(mut self, detail: SyncDetail) -> Self {
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    /// Record how long the call took
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == SyncStatus::Error
    }
}
