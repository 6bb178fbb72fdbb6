//! # migkit_core
//!
//! Migration engine for migkit.
//!
//! This crate ties the Terraform invoker, template renderer and repository
//! hosts together into the Terraform Cloud to Spacelift migration sequence.
//!
//! # Architecture
//!
//! - **Config**: the `migration_data` YAML document and its validation
//! - **Layout**: every path a migration reads or writes, resolved from one root
//! - **Settings**: records rendered into the exporter and manager variable files
//! - **Git**: token-authenticated clone, commit and push of the generated code
//! - **Migration**: the fixed step sequence, halting on the first failure
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use migkit_core::{GitCredential, GitPublisher, Migration, MigrationConfig, MigrationLayout};
//! use migkit_iac::{ProcessRunner, TerraformRunner};
//! use migkit_vcs::{build_host, VcsCredentials};
//!
//! let layout = MigrationLayout::new(".");
//! let config = MigrationConfig::load(&layout.config_file())?;
//! let credentials = config.apply_username(VcsCredentials::from_env()?);
//! let host = build_host(&config.host_settings()?, &credentials)?;
//! let git_user = config.provider()?.git_username(credentials.username.as_deref());
//! let publisher = GitPublisher::new(GitCredential::new(git_user, &credentials.token));
//!
//! let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new()));
//! let report = Migration::new(config, layout, terraform, host, publisher).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod layout;
pub mod migration;
pub mod preflight;
pub mod prompt;
pub mod settings;

pub use config::{expand_env, MigrationConfig};
pub use error::{CoreError, CoreResult};
pub use git::{GitCredential, GitPublisher, PublishedCommit};
pub use layout::MigrationLayout;
pub use migration::{Migration, MigrationReport, MigrationStep, COMMIT_MESSAGE};
pub use preflight::{missing_env_vars, preflight, SPACELIFT_KEY_VARS};
pub use prompt::{confirm, is_affirmative, CONFIRMATION_MESSAGE};
pub use settings::{spacelift_endpoint, ExporterSettings, ManagerStackSettings};
