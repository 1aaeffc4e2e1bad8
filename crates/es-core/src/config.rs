//! Configuration types and parsing for erpsync.yml

use crate::catalog::{EntityCatalog, EntityDefinition};
use crate::error::{CoreError, CoreResult};
use crate::selection::ImportMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Main project configuration from erpsync.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory for run state and result files
    #[serde(default = "default_target_path")]
    pub target_path: String,

    /// Remote sync API connection
    pub connector: ConnectorConfig,

    /// Defaults applied when the CLI does not override them
    #[serde(default)]
    pub defaults: JobDefaults,

    /// Overrides of the built-in entity catalog, keyed by entity key
    #[serde(default)]
    pub entities: BTreeMap<String, EntityOverride>,

    /// Named target configurations (e.g., staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Remote sync API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Base URL of the sync API, e.g. `https://erp.example.com/api`
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Connector settings a target may override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorOverride {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub token_env: Option<String>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    #[serde(default)]
    pub connector: Option<ConnectorOverride>,
}

/// Job defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDefaults {
    #[serde(default)]
    pub import_mode: ImportMode,
}

/// Per-entity override of the built-in catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityOverride {
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub label: Option<String>,
}

const DEFAULT_TARGET_DIR: &str = "target";

const DEFAULT_TOKEN_ENV: &str = "ERPSYNC_TOKEN";

/// Environment variable consulted when no `--target` is given
pub const TARGET_ENV: &str = "ERPSYNC_TARGET";

fn default_target_path() -> String {
    DEFAULT_TARGET_DIR.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for erpsync.yml or erpsync.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("erpsync.yml");
        let yaml_path = dir.join("erpsync.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        validate_connector("connector", &self.connector)?;

        for (name, target) in &self.targets {
            let merged = merge_connector(&self.connector, target.connector.as_ref());
            validate_connector(&format!("targets.{}.connector", name), &merged)?;
        }

        let builtin = EntityCatalog::builtin_definitions();
        for key in self.entities.keys() {
            if !builtin.iter().any(|d| d.key == *key) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Unknown entity '{}' in entities. Known entities: {}",
                        key,
                        builtin
                            .iter()
                            .map(|d| d.key.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get absolute target path relative to a project root
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get connector configuration, optionally applying target overrides
    pub fn connector_for(&self, target: Option<&str>) -> CoreResult<ConnectorConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;
                Ok(merge_connector(
                    &self.connector,
                    target_config.connector.as_ref(),
                ))
            }
            None => Ok(self.connector.clone()),
        }
    }

    /// Resolve target from CLI flag or ERPSYNC_TARGET environment variable
    ///
    /// Priority: CLI flag > ERPSYNC_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV).ok())
            .filter(|t| !t.is_empty())
    }

    /// Built-in entity definitions with the configured overrides applied
    pub fn entity_definitions(&self) -> CoreResult<Vec<EntityDefinition>> {
        let mut definitions = EntityCatalog::builtin_definitions();
        for (key, entity_override) in &self.entities {
            let Some(def) = definitions.iter_mut().find(|d| d.key == *key) else {
                return Err(CoreError::UnknownEntity { key: key.clone() });
            };
            if let Some(enabled) = entity_override.enabled {
                def.enabled = enabled;
            }
            if let Some(label) = &entity_override.label {
                def.label = label.clone();
            }
        }
        Ok(definitions)
    }

    /// Build the entity catalog for this project
    pub fn build_catalog(&self) -> CoreResult<EntityCatalog> {
        EntityCatalog::from_definitions(self.entity_definitions()?)
    }
}

fn merge_connector(base: &ConnectorConfig, over: Option<&ConnectorOverride>) -> ConnectorConfig {
    let Some(over) = over else {
        return base.clone();
    };
    ConnectorConfig {
        base_url: over
            .base_url
            .clone()
            .unwrap_or_else(|| base.base_url.clone()),
        timeout_secs: over.timeout_secs.unwrap_or(base.timeout_secs),
        token_env: over
            .token_env
            .clone()
            .unwrap_or_else(|| base.token_env.clone()),
    }
}

fn validate_connector(context: &str, connector: &ConnectorConfig) -> CoreResult<()> {
    if connector.base_url.trim().is_empty() {
        return Err(CoreError::ConfigInvalid {
            message: format!("{}.base_url cannot be empty", context),
        });
    }
    if !connector.base_url.starts_with("http://") && !connector.base_url.starts_with("https://") {
        return Err(CoreError::ConfigInvalid {
            message: format!(
                "{}.base_url must start with http:// or https://, got '{}'",
                context, connector.base_url
            ),
        });
    }
    if connector.timeout_secs == 0 {
        return Err(CoreError::ConfigInvalid {
            message: format!("{}.timeout_secs must be greater than zero", context),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
