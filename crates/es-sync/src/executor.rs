//! Sequential job execution

use crate::error::AttemptError;
use crate::progress::{ProgressEvent, ProgressReporter};
use es_connector::{Connector, ImportOptions, RemoteResponse};
use es_core::{EntityCatalog, EntityDescriptor, EntityKey, JobKind, SyncJob, SyncResult};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

/// Runs sync jobs against a connector
///
/// Entities run strictly one after another: a later entity may reference
/// records the previous one is still creating, so there are never two
/// remote calls in flight. There is no cancellation; once started, a job
/// attempts every selected entity.
pub struct SyncExecutor<'a> {
    catalog: &'a EntityCatalog,
    connector: &'a dyn Connector,
}

impl<'a> SyncExecutor<'a> {
    /// Create a new executor
    pub fn new(catalog: &'a EntityCatalog, connector: &'a dyn Connector) -> Self {
        Self { catalog, connector }
    }

    /// Run a job and return one result per selected entity, in execution order
    ///
    /// Failures of individual entities are recorded in their results and
    /// never stop the job. Selected keys the executor's catalog does not
    /// know or has disabled are recorded as errors after the ordered
    /// entities, without a remote call. An empty job returns immediately
    /// without calling the connector.
    pub async fn run(&self, job: &SyncJob, progress: &mut dyn ProgressReporter) -> Vec<SyncResult> {
        let order = job.execution_order(self.catalog);
        let unresolved = self.unresolved_keys(job, &order);
        if order.is_empty() && unresolved.is_empty() {
            log::warn!("No entities selected for {}; nothing to run", job.kind());
            return Vec::new();
        }

        let total = order.len();
        log::info!(
            "Starting {} of {} entities via {} connector",
            job.kind(),
            total,
            self.connector.connector_type()
        );

        let mut results = Vec::with_capacity(total);
        for (current_index, entity) in order.into_iter().enumerate() {
            progress.report(&ProgressEvent {
                current_index,
                total,
                entity_key: entity.key.clone(),
                label: entity.label.clone(),
                kind: job.kind(),
            });

            let result = self.run_entity(job, entity).await;
            progress.finished(&result);
            results.push(result);
        }

        // Selected keys this catalog cannot run still get exactly one result
        for key in unresolved {
            let result = self.unresolved_result(key);
            progress.finished(&result);
            results.push(result);
        }

        results
    }

    /// Selected keys missing from the resolved order, sorted
    fn unresolved_keys<'j>(
        &self,
        job: &'j SyncJob,
        order: &[&EntityDescriptor],
    ) -> Vec<&'j EntityKey> {
        let mut missing: Vec<&EntityKey> = job
            .selected_keys()
            .iter()
            .filter(|key| !order.iter().any(|e| e.key == **key))
            .collect();
        missing.sort();
        missing
    }

    fn unresolved_result(&self, key: &EntityKey) -> SyncResult {
        let (label, message) = match self.catalog.get(key) {
            Some(entity) => (
                entity.label.as_str(),
                "entity is disabled in this catalog; not run",
            ),
            None => (key.as_str(), "entity is not part of this catalog; not run"),
        };
        log::warn!("{}: {}", key, message);
        SyncResult::error(key.clone(), label, message)
    }

    /// Attempt a single entity and record its outcome
    pub async fn run_entity(&self, job: &SyncJob, entity: &EntityDescriptor) -> SyncResult {
        let start = Instant::now();
        let outcome = self.attempt(job, entity.key.as_str()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(response) => {
                log::info!(
                    "{} {} succeeded in {}ms: {}",
                    job.kind(),
                    entity.key,
                    duration_ms,
                    response.message
                );
                SyncResult::success(entity.key.clone(), &entity.label, &response.message)
                    .with_detail(response.detail())
            }
            Err(err) => {
                log::warn!("{} {} failed: {}", job.kind(), entity.key, err);
                let message = err.message();
                SyncResult::error(entity.key.clone(), &entity.label, &message)
                    .with_detail(err.into_detail())
            }
        };

        result.with_duration_ms(duration_ms)
    }

    async fn attempt(&self, job: &SyncJob, key: &str) -> Result<RemoteResponse, AttemptError> {
        let call = async {
            match job.kind() {
                JobKind::Import => {
                    let options = ImportOptions {
                        mode: job.import_mode().unwrap_or_default(),
                        dry_run: job.dry_run(),
                    };
                    self.connector.import_entity(key, options).await
                }
                JobKind::Delete => self.connector.delete_entity(key).await,
            }
        };

        let response = AssertUnwindSafe(call)
            .catch_unwind()
            .await
            .map_err(|panic| AttemptError::Panicked(panic_message(panic.as_ref())))??;

        if response.is_success() {
            Ok(response)
        } else {
            let detail = response.detail();
            Err(AttemptError::Rejected {
                message: response.message,
                detail,
            })
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
