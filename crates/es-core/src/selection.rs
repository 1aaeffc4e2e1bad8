//! Operator selection of entities and import mode
//!
//! A `SelectionModel` is created fresh for every job; import and delete
//! never share one.

use crate::catalog::EntityCatalog;
use crate::entity_key::EntityKey;
use crate::error::{CoreError, CoreResult};
use crate::job::{JobKind, SyncJob};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Import semantics passed through to the remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Merge incoming records into existing ones
    #[default]
    Update,
    /// Overwrite existing records
    Replace,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Update => write!(f, "update"),
            ImportMode::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for ImportMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(ImportMode::Update),
            "replace" => Ok(ImportMode::Replace),
            other => Err(CoreError::ConfigInvalid {
                message: format!("unknown import mode '{}' (expected update or replace)", other),
            }),
        }
    }
}

/// Tracks the entities chosen for one job and the import mode
#[derive(Debug)]
pub struct SelectionModel<'a> {
    catalog: &'a EntityCatalog,
    selected: HashSet<EntityKey>,
    import_mode: ImportMode,
}

impl<'a> SelectionModel<'a> {
    /// Create an empty selection over a catalog
    pub fn new(catalog: &'a EntityCatalog) -> Self {
        Self {
            catalog,
            selected: HashSet::new(),
            import_mode: ImportMode::default(),
        }
    }

    fn resolve(&self, key: &str) -> CoreResult<&'a EntityKey> {
        let catalog: &'a EntityCatalog = self.catalog;
        catalog
            .get(key)
            .map(|e| &e.key)
            .ok_or_else(|| CoreError::UnknownEntity {
                key: key.to_string(),
            })
    }

    /// Flip the selection state of an entity
    ///
    /// Disabled entities are left untouched. Returns whether the entity is
    /// selected afterwards.
    pub fn toggle(&mut self, key: &str) -> CoreResult<bool> {
        let entity_key = self.resolve(key)?;
        if !self.catalog.is_enabled(key) {
            log::debug!("Ignoring toggle of disabled entity '{}'", key);
            return Ok(false);
        }
        if self.selected.remove(key) {
            Ok(false)
        } else {
            self.selected.insert(entity_key.clone());
            Ok(true)
        }
    }

    /// Add an entity to the selection (idempotent)
    ///
    /// Returns `false` when the entity is disabled and was not added.
    pub fn select(&mut self, key: &str) -> CoreResult<bool> {
        let entity_key = self.resolve(key)?;
        if !self.catalog.is_enabled(key) {
            log::debug!("Ignoring selection of disabled entity '{}'", key);
            return Ok(false);
        }
        self.selected.insert(entity_key.clone());
        Ok(true)
    }

    /// Select every enabled entity
    pub fn select_all(&mut self) {
        self.selected = self.catalog.enabled_keys().into_iter().cloned().collect();
    }

    /// Remove every entity from the selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Set the import mode
    pub fn set_mode(&mut self, mode: ImportMode) {
        self.import_mode = mode;
    }

    /// Current import mode
    pub fn import_mode(&self) -> ImportMode {
        self.import_mode
    }

    /// Number of selected entities
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Whether an entity is selected
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Selected keys in catalog import order
    pub fn selected_keys(&self) -> Vec<&EntityKey> {
        self.catalog
            .enabled_keys()
            .into_iter()
            .filter(|k| self.selected.contains(k.as_str()))
            .collect()
    }

    /// Freeze the selection into a job
    ///
    /// An empty selection is a validation error, reported before any remote
    /// call can be issued.
    pub fn build_job(&self, kind: JobKind) -> CoreResult<SyncJob> {
        if self.selected.is_empty() {
            return Err(CoreError::EmptySelection {
                kind: kind.to_string(),
            });
        }
        let keys = self.selected.iter().map(|k| k.as_str());
        match kind {
            JobKind::Import => SyncJob::import(self.catalog, keys, self.import_mode),
            JobKind::Delete => SyncJob::delete(self.catalog, keys),
        }
    }
}
