//! Settings records rendered into the Terraform variable files.

use serde::Serialize;

use crate::config::MigrationConfig;

pub const MANAGER_STACK_NAME: &str = "Migration Manager";
pub const MANAGER_STACK_DESCRIPTION: &str = "Manager Stack used for migration";

/// Variables for the Terraform Cloud exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExporterSettings {
    pub tfc_organization: String,
    pub export_state: bool,
    pub vcs_provider: String,
    pub vcs_namespace: String,
    pub vcs_default_branch: String,
}

impl ExporterSettings {
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self {
            tfc_organization: config.tfc_organization.clone(),
            export_state: true,
            vcs_provider: config.vcs_provider.clone(),
            vcs_namespace: config.vcs_namespace.clone(),
            vcs_default_branch: config.vcs_default_branch.clone(),
        }
    }
}

/// Variables for the Spacelift manager stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerStackSettings {
    pub stack_name: String,
    pub stack_description: String,
    /// Repository name as the stack resource expects it.
    pub repository: String,
    /// HTTPS clone URL returned by the provider.
    pub repository_url: String,
    pub branch: String,
    pub project_root: String,
    pub import_state: bool,
    pub spacelift_api_key_endpoint: String,
    pub vcs_provider: String,
    pub vcs_namespace: String,
}

impl ManagerStackSettings {
    pub fn from_config(config: &MigrationConfig, repository_url: &str) -> Self {
        Self {
            stack_name: MANAGER_STACK_NAME.to_string(),
            stack_description: MANAGER_STACK_DESCRIPTION.to_string(),
            repository: config.repo_name.clone(),
            repository_url: repository_url.to_string(),
            branch: config.vcs_default_branch.clone(),
            project_root: String::new(),
            import_state: true,
            spacelift_api_key_endpoint: spacelift_endpoint(&config.spacelift_account),
            vcs_provider: config.vcs_provider.clone(),
            vcs_namespace: config.vcs_namespace.clone(),
        }
    }
}

/// API endpoint of a Spacelift account.
pub fn spacelift_endpoint(account: &str) -> String {
    format!("https://{account}.app.spacelift.io")
}
