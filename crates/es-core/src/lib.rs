//! es-core - Core library for erpsync
//!
//! This crate provides the entity catalog, the dependency DAG that orders
//! import and delete jobs, operator selection, job and result types, run
//! state tracking, and configuration parsing shared by all erpsync crates.

pub mod catalog;
pub mod config;
pub mod dag;
pub mod entity_key;
pub mod error;
pub mod job;
pub mod project;
pub mod result;
pub mod run_state;
pub mod selection;
pub mod summary;

pub use catalog::{EntityCatalog, EntityDefinition, EntityDescriptor};
pub use config::{Config, ConnectorConfig};
pub use entity_key::EntityKey;
pub use error::{CoreError, CoreResult};
pub use job::{JobKind, SyncJob};
pub use project::Project;
pub use result::{ItemAction, ItemId, ItemIssue, SyncDetail, SyncResult, SyncStatus};
pub use run_state::{RunStatus, SyncRunState, SyncRunStateSummary};
pub use selection::{ImportMode, SelectionModel};
pub use summary::{extract_item_issues, failed_keys, summarize, ItemIssues, JobOutcome, JobSummary};
