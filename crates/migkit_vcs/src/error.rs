//! Error types for repository provisioning.

use thiserror::Error;

/// Result type alias for VCS operations.
pub type VcsResult<T> = Result<T, VcsError>;

/// Errors that can occur while talking to a VCS provider.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("You have not provided a supported vcs provider: {0}")]
    UnsupportedProvider(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Provider {provider} requires the '{setting}' setting")]
    MissingSetting { provider: String, setting: String },

    #[error("{provider} API returned {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to find HTTPS clone URL for the created {provider} repository")]
    MissingCloneUrl { provider: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
