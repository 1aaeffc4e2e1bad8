//! Sync jobs: one operator-initiated import or delete run

use crate::catalog::{EntityCatalog, EntityDescriptor};
use crate::entity_key::EntityKey;
use crate::error::{CoreError, CoreResult};
use crate::selection::ImportMode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which pipeline a job runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Pull entities from the ERP into the local database
    Import,
    /// Remove previously-imported entities
    Delete,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Import => write!(f, "import"),
            JobKind::Delete => write!(f, "delete"),
        }
    }
}

/// An immutable description of one run
///
/// Every key is validated against the catalog at construction: unknown and
/// disabled entities are rejected, so each selected key yields exactly one
/// result when the job runs.
#[derive(Debug, Clone)]
pub struct SyncJob {
    selected_keys: HashSet<EntityKey>,
    kind: JobKind,
    import_mode: ImportMode,
    dry_run: bool,
}

impl SyncJob {
    /// Create an import job
    pub fn import<'k>(
        catalog: &EntityCatalog,
        keys: impl IntoIterator<Item = &'k str>,
        mode: ImportMode,
    ) -> CoreResult<Self> {
        Self::new(catalog, keys, JobKind::Import, mode)
    }

    /// Create a delete job
    pub fn delete<'k>(
        catalog: &EntityCatalog,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> CoreResult<Self> {
        Self::new(catalog, keys, JobKind::Delete, ImportMode::default())
    }

    fn new<'k>(
        catalog: &EntityCatalog,
        keys: impl IntoIterator<Item = &'k str>,
        kind: JobKind,
        import_mode: ImportMode,
    ) -> CoreResult<Self> {
        let mut selected_keys = HashSet::new();
        for key in keys {
            let Some(entity) = catalog.get(key) else {
                return Err(CoreError::UnknownEntity {
                    key: key.to_string(),
                });
            };
            if !entity.enabled {
                return Err(CoreError::DisabledEntity {
                    key: key.to_string(),
                });
            }
            selected_keys.insert(entity.key.clone());
        }

        Ok(Self {
            selected_keys,
            kind,
            import_mode,
            dry_run: false,
        })
    }

    /// Ask the remote side to validate without writing (import only)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run && self.kind == JobKind::Import;
        self
    }

    /// Which pipeline this job runs
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Import mode, `None` for delete jobs
    pub fn import_mode(&self) -> Option<ImportMode> {
        match self.kind {
            JobKind::Import => Some(self.import_mode),
            JobKind::Delete => None,
        }
    }

    /// Whether the import runs as a dry run
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Selected entity keys (unordered)
    pub fn selected_keys(&self) -> &HashSet<EntityKey> {
        &self.selected_keys
    }

    /// Whether an entity is part of this job
    pub fn contains(&self, key: &str) -> bool {
        self.selected_keys.contains(key)
    }

    /// Number of selected entities
    pub fn len(&self) -> usize {
        self.selected_keys.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected_keys.is_empty()
    }

    /// The selected entities in the order this job must process them
    ///
    /// Import follows ascending import rank; delete follows the catalog's
    /// delete order (the reverse).
    pub fn execution_order<'c>(&self, catalog: &'c EntityCatalog) -> Vec<&'c EntityDescriptor> {
        match self.kind {
            JobKind::Import => catalog
                .list_import_order()
                .into_iter()
                .filter(|e| self.contains(&e.key))
                .collect(),
            JobKind::Delete => catalog
                .list_delete_order()
                .into_iter()
                .filter(|k| self.contains(k))
                .filter_map(|k| catalog.get(k))
                .collect(),
        }
    }
}
