//! Error types for the core module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while running a migration.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration references undefined environment variable: {0}")]
    UndefinedEnvVar(String),

    #[error("Migration aborted by operator")]
    Aborted,

    #[error("Preflight check failed: {0}")]
    Preflight(String),

    #[error("Git error: {0}")]
    GitError(String),

    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration step did not finish: {0}")]
    TaskFailed(String),

    #[error("Template error: {0}")]
    Template(#[from] migkit_templates::TemplateError),

    #[error("Terraform error: {0}")]
    Iac(#[from] migkit_iac::IacError),

    #[error("VCS error: {0}")]
    Vcs(#[from] migkit_vcs::VcsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
