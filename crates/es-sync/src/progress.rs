//! Progress reporting for running jobs

use es_core::{EntityKey, JobKind, SyncResult};

/// Emitted once before each entity's remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0-based position of the entity in the execution order
    pub current_index: usize,
    pub total: usize,
    pub entity_key: EntityKey,
    pub label: String,
    pub kind: JobKind,
}

impl ProgressEvent {
    /// 1-based position, as shown to operators
    pub fn ordinal(&self) -> usize {
        self.current_index + 1
    }
}

/// Sink for progress events
///
/// The executor never reads anything back from a reporter.
pub trait ProgressReporter {
    /// Called before the remote call for an entity
    fn report(&mut self, event: &ProgressEvent);

    /// Called once the entity's result is recorded
    fn finished(&mut self, _result: &SyncResult) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(&ProgressEvent),
{
    fn report(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _event: &ProgressEvent) {}
}
