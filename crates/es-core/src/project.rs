//! Project discovery and loading

use crate::catalog::EntityCatalog;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// An erpsync project: a directory holding `erpsync.yml`
#[derive(Debug)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Project configuration
    pub config: Config,

    /// Entity catalog with config overrides applied
    pub catalog: EntityCatalog,
}

impl Project {
    /// Load a project from a directory
    pub fn load(path: &Path) -> CoreResult<Self> {
        let root = Self::resolve_root(path)?;
        let config = Config::load_from_dir(&root)?;
        Self::from_config(root, config)
    }

    /// Load a project using an explicit config file
    pub fn load_with_config(path: &Path, config_path: &Path) -> CoreResult<Self> {
        let root = Self::resolve_root(path)?;
        let config_path = if config_path.is_absolute() {
            config_path.to_path_buf()
        } else {
            root.join(config_path)
        };
        let config = Config::load(&config_path)?;
        Self::from_config(root, config)
    }

    fn resolve_root(path: &Path) -> CoreResult<PathBuf> {
        let root = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !root.exists() {
            return Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(root)
    }

    fn from_config(root: PathBuf, config: Config) -> CoreResult<Self> {
        let catalog = config.build_catalog()?;
        log::debug!(
            "Loaded project '{}' with {} entities ({} enabled)",
            config.name,
            catalog.len(),
            catalog.enabled_keys().len()
        );
        Ok(Self {
            root,
            config,
            catalog,
        })
    }

    /// Get the target directory path
    pub fn target_dir(&self) -> PathBuf {
        self.config.target_path_absolute(&self.root)
    }

    /// Path of the persisted run state
    pub fn run_state_path(&self) -> PathBuf {
        self.target_dir().join("sync_state.json")
    }

    /// Path of the latest results report
    pub fn results_path(&self) -> PathBuf {
        self.target_dir().join("sync_results.json")
    }
}
