//! Entity catalog: the fixed registry of syncable business entities
//!
//! Import ranks and the delete order are computed from the catalog's
//! dependency DAG, never maintained by hand.

use crate::dag::EntityDag;
use crate::entity_key::EntityKey;
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Declaration of one entity, as written in code or configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    /// Unique entity key used by the remote sync endpoints
    pub key: String,

    /// Human-readable label
    pub label: String,

    /// Disabled entities are listed but can never be selected
    pub enabled: bool,

    /// Entities that must be imported before this one
    pub depends_on: Vec<String>,
}

impl EntityDefinition {
    /// Create an enabled definition with no dependencies
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            enabled: true,
            depends_on: Vec::new(),
        }
    }

    /// Set the entities this one depends on
    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.depends_on = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Mark the definition as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A resolved catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Unique entity key
    pub key: EntityKey,

    /// Human-readable label
    pub label: String,

    /// Whether the entity can be selected
    pub enabled: bool,

    /// 1-based position in import order; dependencies always rank lower
    pub import_rank: u32,

    /// Direct dependencies, in catalog declaration order
    pub depends_on: Vec<EntityKey>,
}

/// Read-only registry of entity descriptors plus their dependency DAG
#[derive(Debug)]
pub struct EntityCatalog {
    /// Descriptors sorted by ascending import rank (disabled included)
    entities: Vec<EntityDescriptor>,

    /// Key -> index into `entities`
    index: HashMap<EntityKey, usize>,

    dag: EntityDag,
}

impl EntityCatalog {
    /// Build a catalog from definitions in declaration order
    ///
    /// Declaration order breaks ties between entities that have no
    /// dependency relation to each other.
    pub fn from_definitions(definitions: Vec<EntityDefinition>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.key.is_empty() {
                return Err(CoreError::EmptyName {
                    context: "entity key in catalog".into(),
                });
            }
            if !seen.insert(def.key.as_str()) {
                return Err(CoreError::DuplicateEntity {
                    key: def.key.clone(),
                });
            }
        }

        let pairs: Vec<(String, Vec<String>)> = definitions
            .iter()
            .map(|d| (d.key.clone(), d.depends_on.clone()))
            .collect();
        let dag = EntityDag::build(&pairs)?;
        let order = dag.topological_order()?;

        let by_key: HashMap<&str, &EntityDefinition> =
            definitions.iter().map(|d| (d.key.as_str(), d)).collect();

        let mut entities = Vec::with_capacity(order.len());
        let mut index = HashMap::with_capacity(order.len());
        for (pos, key) in order.into_iter().enumerate() {
            let Some(def) = by_key.get(key.as_str()) else {
                return Err(CoreError::UnknownEntity {
                    key: key.into_inner(),
                });
            };
            index.insert(key.clone(), pos);
            entities.push(EntityDescriptor {
                depends_on: dag.dependencies(&key),
                key,
                label: def.label.clone(),
                enabled: def.enabled,
                import_rank: pos as u32 + 1,
            });
        }

        let catalog = Self {
            entities,
            index,
            dag,
        };
        catalog.warn_disabled_dependencies();
        Ok(catalog)
    }

    /// The built-in business catalog
    pub fn builtin() -> CoreResult<Self> {
        Self::from_definitions(Self::builtin_definitions())
    }

    /// Definitions of the built-in business catalog, in declaration order
    pub fn builtin_definitions() -> Vec<EntityDefinition> {
        vec![
            EntityDefinition::new("countries", "Countries"),
            EntityDefinition::new("governorates", "Governorates").depends_on(&["countries"]),
            EntityDefinition::new("area_tags", "Area Tags").depends_on(&["governorates"]),
            EntityDefinition::new("client_types", "Client Types"),
            EntityDefinition::new("clients", "Clients").depends_on(&["client_types", "area_tags"]),
            EntityDefinition::new("suppliers", "Suppliers").depends_on(&["countries"]),
            EntityDefinition::new("product_categories", "Product Categories"),
            EntityDefinition::new("products", "Products").depends_on(&["product_categories"]),
            EntityDefinition::new("product_variants", "Product Variants").depends_on(&["products"]),
            EntityDefinition::new("warehouses", "Warehouses"),
            EntityDefinition::new("purchase_orders", "Purchase Orders").depends_on(&[
                "suppliers",
                "product_variants",
                "warehouses",
            ]),
            EntityDefinition::new("sales_orders", "Sales Orders").depends_on(&[
                "clients",
                "product_variants",
                "warehouses",
            ]),
            EntityDefinition::new("sales_returns", "Sales Returns")
                .depends_on(&["sales_orders"])
                .disabled(),
            EntityDefinition::new("safes", "Safes"),
            EntityDefinition::new("safe_transactions", "Safe Transactions").depends_on(&[
                "safes",
                "clients",
                "suppliers",
            ]),
        ]
    }

    fn warn_disabled_dependencies(&self) {
        for entity in self.entities.iter().filter(|e| e.enabled) {
            for dep in &entity.depends_on {
                if !self.is_enabled(dep) {
                    log::warn!(
                        "Entity '{}' depends on disabled entity '{}'",
                        entity.key,
                        dep
                    );
                }
            }
        }
    }

    /// Enabled entities in import order (ascending rank)
    pub fn list_import_order(&self) -> Vec<&EntityDescriptor> {
        self.entities.iter().filter(|e| e.enabled).collect()
    }

    /// Enabled entity keys in delete order (exact reverse of import order)
    pub fn list_delete_order(&self) -> Vec<&EntityKey> {
        self.entities
            .iter()
            .rev()
            .filter(|e| e.enabled)
            .map(|e| &e.key)
            .collect()
    }

    /// All descriptors in import order, disabled ones included
    pub fn all(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Look up a descriptor by key
    pub fn get(&self, key: &str) -> Option<&EntityDescriptor> {
        self.index.get(key).map(|&i| &self.entities[i])
    }

    /// Check if a key is part of the catalog
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Check if a key exists and is enabled
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|e| e.enabled)
    }

    /// Keys of all enabled entities, in import order
    pub fn enabled_keys(&self) -> Vec<&EntityKey> {
        self.entities
            .iter()
            .filter(|e| e.enabled)
            .map(|e| &e.key)
            .collect()
    }

    /// Direct dependencies of an entity
    pub fn dependencies(&self, key: &str) -> Vec<EntityKey> {
        self.dag.dependencies(key)
    }

    /// Direct dependents of an entity
    pub fn dependents(&self, key: &str) -> Vec<EntityKey> {
        self.dag.dependents(key)
    }

    /// Transitive dependencies of an entity
    pub fn transitive_dependencies(&self, key: &str) -> Vec<EntityKey> {
        self.dag.ancestors(key)
    }

    /// Transitive dependents of an entity
    pub fn transitive_dependents(&self, key: &str) -> Vec<EntityKey> {
        self.dag.descendants(key)
    }

    /// Number of entities, disabled included
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the catalog has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
