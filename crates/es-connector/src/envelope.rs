//! JSON envelope exchanged with the remote sync endpoints

use es_core::{ImportMode, ItemAction, ItemId, ItemIssue, SyncDetail};
use serde::{Deserialize, Serialize};

/// Options sent with every import call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub mode: ImportMode,
    pub dry_run: bool,
}

/// Envelope status reported by the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Success,
    Error,
}

/// Response body of an import or delete call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub status: RemoteStatus,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RemoteData>,
}

impl RemoteResponse {
    /// A success envelope with no data
    pub fn success(message: &str) -> Self {
        Self {
            status: RemoteStatus::Success,
            message: message.to_string(),
            data: None,
        }
    }

    /// An error envelope
    pub fn error(message: &str) -> Self {
        Self {
            status: RemoteStatus::Error,
            message: message.to_string(),
            data: None,
        }
    }

    /// Attach a data payload
    pub fn with_data(mut self, data: RemoteData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == RemoteStatus::Success
    }

    /// Item detail carried by the envelope, empty when there is none
    pub fn detail(&self) -> SyncDetail {
        self.data
            .as_ref()
            .map(RemoteData::to_detail)
            .unwrap_or_default()
    }
}

/// Optional payload of an envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteData {
    #[serde(default)]
    pub details: Vec<RemoteItem>,

    #[serde(default)]
    pub skipped_orders_log: Vec<String>,
}

impl RemoteData {
    /// Convert to the item detail kept on a result
    ///
    /// Items with an action other than failed or skipped carry no issue and
    /// are dropped.
    pub fn to_detail(&self) -> SyncDetail {
        SyncDetail {
            items: self.details.iter().filter_map(RemoteItem::to_issue).collect(),
            skipped_log: self.skipped_orders_log.clone(),
        }
    }
}

/// Per-record action reported by the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteAction {
    Failed,
    Skipped,
    #[serde(other)]
    Other,
}

/// One record entry in `data.details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub action: RemoteAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Some endpoints report the reason under `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RemoteItem {
    fn to_issue(&self) -> Option<ItemIssue> {
        let action = match self.action {
            RemoteAction::Failed => ItemAction::Failed,
            RemoteAction::Skipped => ItemAction::Skipped,
            RemoteAction::Other => return None,
        };
        Some(ItemIssue {
            id: self.id.clone(),
            name: self.name.clone(),
            action,
            reason: self.reason.clone().or_else(|| self.error.clone()),
        })
    }
}
