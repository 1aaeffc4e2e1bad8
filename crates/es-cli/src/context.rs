//! Runtime context for CLI commands

use anyhow::{Context, Result};
use es_connector::HttpConnector;
use es_core::{Config, Project};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Loaded project plus the resolved target
pub(crate) struct RuntimeContext {
    /// The loaded project
    pub project: Project,

    /// Target name from --target or ERPSYNC_TARGET
    pub target: Option<String>,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let project_path = Path::new(&args.project_dir);

        let project = match &args.config {
            Some(config_path) => Project::load_with_config(project_path, Path::new(config_path))
                .context("Failed to load configuration file")?,
            None => Project::load(project_path).context("Failed to load project")?,
        };

        let target = Config::resolve_target(args.target.as_deref());
        if let Some(name) = &target {
            log::debug!("Using target '{}'", name);
        }

        Ok(Self {
            project,
            target,
            verbose: args.verbose,
        })
    }

    /// Build the HTTP connector for the resolved target
    pub fn connector(&self) -> Result<HttpConnector> {
        let config = self
            .project
            .config
            .connector_for(self.target.as_deref())
            .context("Failed to resolve connector configuration")?;
        self.verbose(&format!("Connector base URL: {}", config.base_url));
        HttpConnector::new(&config).context("Failed to create HTTP connector")
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}
