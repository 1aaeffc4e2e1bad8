//! Error types for es-core

use thiserror::Error;

/// Core error type for erpsync
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Entity key is not part of the catalog
    #[error("[E005] Unknown entity: {key}")]
    UnknownEntity { key: String },

    /// E006: Entity exists but is disabled in the catalog
    #[error("[E006] Entity '{key}' is disabled and cannot be synced")]
    DisabledEntity { key: String },

    /// E007: Circular dependency detected
    #[error("[E007] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E008: Duplicate entity key
    #[error("[E008] Duplicate entity key: {key}")]
    DuplicateEntity { key: String },

    /// E009: Dependency on an entity that is not declared
    #[error("[E009] Entity '{entity}' depends on unknown entity '{dependency}'")]
    UnknownDependency { entity: String, dependency: String },

    /// E010: Entity lists itself as a dependency
    #[error("[E010] Entity '{key}' cannot depend on itself")]
    SelfDependency { key: String },

    /// E011: Empty name where a non-empty one is required
    #[error("[E011] Empty name not allowed: {context}")]
    EmptyName { context: String },

    /// E012: Job has no selected entities
    #[error("[E012] No entities selected for {kind}")]
    EmptySelection { kind: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
