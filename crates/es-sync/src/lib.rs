//! es-sync - Sync job execution for erpsync
//!
//! Runs an import or delete job one entity at a time in dependency order,
//! turning every per-entity failure into an error result so the rest of the
//! job still runs.

pub mod error;
pub mod executor;
pub mod progress;

pub use error::AttemptError;
pub use executor::SyncExecutor;
pub use progress::{NoProgress, ProgressEvent, ProgressReporter};
