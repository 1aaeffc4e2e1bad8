//! Run state tracking for the most recent sync job
//!
//! The state is rewritten after every entity so that an interrupted run
//! still records which entities completed, which failed, and which never
//! ran. `erpsync status` reads it back and `--retry-failed` re-runs the
//! failed entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::entity_key::EntityKey;
use crate::error::CoreResult;
use crate::job::JobKind;
use crate::result::SyncResult;
use crate::selection::ImportMode;

/// State of a sync job in progress or completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRunState {
    /// Short unique identifier for this run
    pub run_id: String,

    /// Import or delete
    pub kind: JobKind,

    /// Import mode, absent for delete jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_mode: Option<ImportMode>,

    /// Whether the import was a dry run
    #[serde(default)]
    pub dry_run: bool,

    pub started_at: DateTime<Utc>,

    pub last_updated_at: DateTime<Utc>,

    pub status: RunStatus,

    /// Entities that finished successfully
    pub completed_entities: Vec<CompletedEntity>,

    /// Entities that failed
    pub failed_entities: Vec<FailedEntity>,

    /// Entities not yet attempted, in execution order
    pub pending_entities: Vec<EntityKey>,
}

/// Status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An entity that completed successfully
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedEntity {
    pub key: EntityKey,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// An entity that failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedEntity {
    pub key: EntityKey,
    pub failed_at: DateTime<Utc>,
    pub error: String,
}

/// Summary statistics for a run state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRunStateSummary {
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub total_duration_ms: u64,
}

impl SyncRunState {
    /// Start tracking a job whose entities will run in `pending` order
    pub fn new(kind: JobKind, import_mode: Option<ImportMode>, pending: Vec<EntityKey>) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            kind,
            import_mode,
            dry_run: false,
            started_at: now,
            last_updated_at: now,
            status: RunStatus::Running,
            completed_entities: Vec::new(),
            failed_entities: Vec::new(),
            pending_entities: pending,
        }
    }

    /// Load run state from a file path, `None` when no run has been recorded
    pub fn load(path: &Path) -> CoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let state: SyncRunState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    /// Save run state atomically (write to temp, then rename)
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Record the outcome of one entity
    pub fn record(&mut self, result: &SyncResult) {
        let now = Utc::now();
        self.pending_entities.retain(|k| *k != result.entity_key);

        if result.is_success() {
            self.completed_entities.push(CompletedEntity {
                key: result.entity_key.clone(),
                completed_at: now,
                duration_ms: result.duration_ms,
            });
        } else {
            self.failed_entities.push(FailedEntity {
                key: result.entity_key.clone(),
                failed_at: now,
                error: result.message.clone(),
            });
        }

        self.last_updated_at = now;
    }

    /// Mark the run as finished
    pub fn mark_run_completed(&mut self) {
        self.status = if self.failed_entities.is_empty() && self.pending_entities.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
        self.last_updated_at = Utc::now();
    }

    pub fn is_completed(&self, key: &str) -> bool {
        self.completed_entities.iter().any(|e| e.key == key)
    }

    pub fn is_failed(&self, key: &str) -> bool {
        self.failed_entities.iter().any(|e| e.key == key)
    }

    /// Keys of the failed entities (for --retry-failed)
    pub fn failed_keys(&self) -> Vec<EntityKey> {
        self.failed_entities.iter().map(|e| e.key.clone()).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> SyncRunStateSummary {
        SyncRunStateSummary {
            completed: self.completed_entities.len(),
            failed: self.failed_entities.len(),
            pending: self.pending_entities.len(),
            total_duration_ms: self.completed_entities.iter().map(|e| e.duration_ms).sum(),
        }
    }
}

#[cfg(test)]
#[path = "run_state_test.rs"]
mod tests;
