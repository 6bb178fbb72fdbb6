//! # migkit_vcs
//!
//! Remote repository provisioning for migkit.
//!
//! Each supported version-control provider implements [`RepositoryHost`], a
//! single capability: create a repository and hand back its HTTPS clone URL.
//! [`build_host`] picks the implementation for the configured provider.
//!
//! Supported providers:
//!
//! - `github` / `github_enterprise` ([`GitHubHost`])
//! - `gitlab` ([`GitLabHost`])
//! - `azure_devops` ([`AzureDevOpsHost`])
//! - `bitbucket` ([`BitbucketHost`], username + app password + workspace)
//!
//! ## Example
//!
//! ```rust,no_run
//! use migkit_vcs::{build_host, HostSettings, NewRepository, VcsCredentials, VcsProvider};
//!
//! # async fn run() -> migkit_vcs::VcsResult<()> {
//! let settings = HostSettings::new(VcsProvider::GitHub, "acme");
//! let credentials = VcsCredentials::from_env()?;
//! let host = build_host(&settings, &credentials)?;
//!
//! let clone_url = host
//!     .create_repository(&NewRepository::new("tfc_migration"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod azure;
pub mod bitbucket;
pub mod error;
pub mod github;
pub mod gitlab;
pub mod host;
pub mod provider;

pub use azure::AzureDevOpsHost;
pub use bitbucket::BitbucketHost;
pub use error::{VcsError, VcsResult};
pub use github::GitHubHost;
pub use gitlab::GitLabHost;
pub use host::{build_host, HostSettings, NewRepository, RepositoryHost, VcsCredentials};
pub use provider::VcsProvider;
