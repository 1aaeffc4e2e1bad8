//! Folding per-entity results into a job-level summary

use crate::entity_key::EntityKey;
use crate::result::{ItemAction, ItemIssue, SyncResult, SyncStatus};
use serde::Serialize;
use std::fmt;

/// Overall classification of a finished job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOutcome {
    /// No entity failed
    Success,
    /// Some entities failed, some succeeded
    Partial,
    /// Every entity failed
    Error,
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Success => write!(f, "success"),
            JobOutcome::Partial => write!(f, "partial"),
            JobOutcome::Error => write!(f, "error"),
        }
    }
}

/// Counts derived from a results list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub success_count: usize,
    pub error_count: usize,
    pub total: usize,
}

impl JobSummary {
    /// Count results by status
    pub fn from_results(results: &[SyncResult]) -> Self {
        let success_count = results
            .iter()
            .filter(|r| r.status == SyncStatus::Success)
            .count();
        let error_count = results
            .iter()
            .filter(|r| r.status == SyncStatus::Error)
            .count();
        Self {
            success_count,
            error_count,
            total: results.len(),
        }
    }

    /// Classify the job
    ///
    /// Rules apply in order: no errors is `Success` (an empty job included),
    /// no successes out of a non-empty job is `Error`, anything else is
    /// `Partial`.
    pub fn outcome(&self) -> JobOutcome {
        if self.error_count == 0 {
            JobOutcome::Success
        } else if self.success_count == 0 && self.total > 0 {
            JobOutcome::Error
        } else {
            JobOutcome::Partial
        }
    }
}

/// Summarize a results list
pub fn summarize(results: &[SyncResult]) -> JobSummary {
    JobSummary::from_results(results)
}

/// Item-level issues of one entity, split by action
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ItemIssues<'a> {
    pub failed: Vec<&'a ItemIssue>,
    pub skipped: Vec<&'a ItemIssue>,
}

impl ItemIssues<'_> {
    pub fn is_empty(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Partition a result's item detail into failed and skipped records
pub fn extract_item_issues(result: &SyncResult) -> ItemIssues<'_> {
    let mut issues = ItemIssues::default();
    let Some(detail) = &result.detail else {
        return issues;
    };
    for item in &detail.items {
        match item.action {
            ItemAction::Failed => issues.failed.push(item),
            ItemAction::Skipped => issues.skipped.push(item),
        }
    }
    issues
}

/// Keys of every failed entity, in result order
pub fn failed_keys(results: &[SyncResult]) -> Vec<EntityKey> {
    results
        .iter()
        .filter(|r| r.is_error())
        .map(|r| r.entity_key.clone())
        .collect()
}
