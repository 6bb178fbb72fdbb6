//! Migration configuration document.
//!
//! The document is YAML with a single `migration_data` section:
//!
//! ```yaml
//! migration_data:
//!   tfc_organization: acme-tfc
//!   vcs_provider: github
//!   vcs_namespace: acme
//!   spacelift_account: acme
//!   repo_name: tfc_migration
//!   vcs_default_branch: main
//! ```
//!
//! `${VAR}` references are expanded from the environment before parsing.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use migkit_vcs::{HostSettings, NewRepository, VcsCredentials, VcsProvider};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    migration_data: Option<MigrationConfig>,
}

/// Settings for one migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Terraform Cloud organization being exported.
    pub tfc_organization: String,
    /// Provider identifier, e.g. `github` or `azure_devops`.
    pub vcs_provider: String,
    pub vcs_namespace: String,
    /// Spacelift account (subdomain of `app.spacelift.io`).
    pub spacelift_account: String,
    /// Name of the repository that receives the generated code.
    pub repo_name: String,
    pub vcs_default_branch: String,

    /// API base URL override; required for GitHub Enterprise.
    pub vcs_api_url: Option<String>,
    /// Bitbucket account username (falls back to `VCS_USERNAME`).
    pub vcs_username: Option<String>,
    /// Bitbucket workspace or Azure DevOps project.
    pub vcs_workspace: Option<String>,
    pub repo_private: bool,
    pub repo_description: Option<String>,
}

impl MigrationConfig {
    /// Load, expand and validate the configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }

        info!("Loading configuration from {:?}", path);
        let content = fs::read_to_string(path)?;
        let expanded = expand_env(&content, |name| std::env::var(name).ok())?;
        let config = Self::from_yaml(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the document without environment expansion or validation.
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let document: ConfigDocument = serde_yaml::from_str(content)?;
        document
            .migration_data
            .ok_or_else(|| CoreError::InvalidConfig("missing 'migration_data' section".to_string()))
    }

    /// Check required fields and the provider identifier.
    pub fn validate(&self) -> CoreResult<()> {
        let required = [
            ("tfc_organization", &self.tfc_organization),
            ("vcs_provider", &self.vcs_provider),
            ("vcs_namespace", &self.vcs_namespace),
            ("spacelift_account", &self.spacelift_account),
            ("repo_name", &self.repo_name),
            ("vcs_default_branch", &self.vcs_default_branch),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        if self.repo_name.contains(['/', '\\']) || self.repo_name == "." || self.repo_name == ".." {
            return Err(CoreError::InvalidConfig(format!(
                "repo_name must be a plain name, got '{}'",
                self.repo_name
            )));
        }

        self.provider()?;
        debug!("Configuration is valid");
        Ok(())
    }

    /// Parsed provider identifier.
    pub fn provider(&self) -> CoreResult<VcsProvider> {
        Ok(self.vcs_provider.parse::<VcsProvider>()?)
    }

    /// Connection settings for the repository host.
    pub fn host_settings(&self) -> CoreResult<HostSettings> {
        let mut settings = HostSettings::new(self.provider()?, &self.vcs_namespace);
        if let Some(url) = self.vcs_api_url.as_deref().filter(|u| !u.is_empty()) {
            settings = settings.api_url(url);
        }
        if let Some(workspace) = self.vcs_workspace.as_deref().filter(|w| !w.is_empty()) {
            settings = settings.workspace(workspace);
        }
        Ok(settings)
    }

    /// Attach the configured username to credentials read from the environment.
    pub fn apply_username(&self, credentials: VcsCredentials) -> VcsCredentials {
        match self.vcs_username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => credentials.with_username(username),
            None => credentials,
        }
    }

    /// Repository request derived from the configuration.
    pub fn new_repository(&self) -> NewRepository {
        let repo = NewRepository::new(&self.repo_name).private(self.repo_private);
        match &self.repo_description {
            Some(description) if !description.is_empty() => repo.description(description),
            _ => repo,
        }
    }
}

/// Replace `${NAME}` with values from `lookup`.
pub fn expand_env<F>(content: &str, lookup: F) -> CoreResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env pattern is valid");

    let mut expanded = String::with_capacity(content.len());
    let mut last = 0;
    for caps in pattern.captures_iter(content) {
        let whole = caps.get(0).expect("group 0 always matches");
        let name = &caps[1];
        let value = lookup(name).ok_or_else(|| CoreError::UndefinedEnvVar(name.to_string()))?;
        expanded.push_str(&content[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }
    expanded.push_str(&content[last..]);

    Ok(expanded)
}
