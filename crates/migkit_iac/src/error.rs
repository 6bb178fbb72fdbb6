//! Error types for Terraform invocation.

use thiserror::Error;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while invoking Terraform.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Terraform not available: {0}")]
    TerraformNotAvailable(String),

    #[error("Error encountered while running '{command}' in {working_dir} (exit code {code})")]
    CommandFailed {
        command: String,
        working_dir: String,
        code: i32,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Terraform working directory does not exist: {0}")]
    MissingWorkingDir(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
