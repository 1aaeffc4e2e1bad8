//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use es_core::ImportMode;

/// erpsync - dependency-ordered bulk import and delete of ERP entities
#[derive(Parser, Debug)]
#[command(name = "erpsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Target connector override (falls back to ERPSYNC_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List entities in import order with their dependencies
    Catalog(CatalogArgs),

    /// Import entities from the ERP in dependency order
    Import(ImportArgs),

    /// Delete imported entities in reverse dependency order
    Delete(DeleteArgs),

    /// Show the state of the last sync run
    Status(StatusArgs),
}

/// Arguments for the catalog command
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: CatalogOutput,
}

/// Catalog output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Entity selection shared by import and delete
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Entity keys to sync (comma-separated)
    #[arg(short, long, value_delimiter = ',', conflicts_with_all = ["all", "retry_failed"])]
    pub entities: Vec<String>,

    /// Select every enabled entity
    #[arg(long, conflicts_with = "retry_failed")]
    pub all: bool,

    /// Re-run only the entities that failed in the previous run of this command
    #[arg(long)]
    pub retry_failed: bool,

    /// Also select dependencies (import) or dependents (delete)
    #[arg(long)]
    pub with_deps: bool,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Import mode (defaults to the project's configured mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Ask the ERP to validate without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for sync commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Import mode flag values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Merge incoming records into existing ones
    Update,
    /// Overwrite existing records
    Replace,
}

impl From<ModeArg> for ImportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Update => ImportMode::Update,
            ModeArg::Replace => ImportMode::Replace,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
