//! Connector trait definition

use crate::envelope::{ImportOptions, RemoteResponse};
use crate::error::ConnectorResult;
use async_trait::async_trait;

/// The remote sync API, one call per entity
///
/// Implementations must be Send + Sync for async operation. A returned
/// `Err` and an `Ok` envelope with `status: error` are both entity
/// failures; callers treat them the same way.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Import every record of one entity from the ERP
    async fn import_entity(
        &self,
        entity: &str,
        options: ImportOptions,
    ) -> ConnectorResult<RemoteResponse>;

    /// Delete every previously-imported record of one entity
    async fn delete_entity(&self, entity: &str) -> ConnectorResult<RemoteResponse>;

    /// Connector type identifier for logging
    fn connector_type(&self) -> &'static str;
}
