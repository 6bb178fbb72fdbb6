//! Checks run before any migration step touches remote systems.

use tracing::{info, warn};

use migkit_iac::TerraformRunner;

use crate::error::{CoreError, CoreResult};
use crate::git::GitPublisher;

/// Consumed by the generated Terraform variable files, not by migkit itself.
pub const SPACELIFT_KEY_VARS: [&str; 2] = [
    "TF_VAR_spacelift_api_key_id",
    "TF_VAR_spacelift_api_key_secret",
];

/// Names from [`SPACELIFT_KEY_VARS`] that `lookup` cannot resolve.
pub fn missing_env_vars<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    SPACELIFT_KEY_VARS
        .into_iter()
        .filter(|name| lookup(name).map_or(true, |v| v.is_empty()))
        .collect()
}

/// Verify Terraform and Git are usable; returns non-fatal warnings.
pub fn preflight(terraform: &TerraformRunner) -> CoreResult<Vec<String>> {
    terraform.ensure_available()?;

    if !GitPublisher::is_git_available() {
        return Err(CoreError::Preflight("git is not installed or not on PATH".to_string()));
    }

    let warnings: Vec<String> = missing_env_vars(|name| std::env::var(name).ok())
        .into_iter()
        .map(|name| format!("{name} is not set; Terraform will prompt for it or fail"))
        .collect();

    for warning in &warnings {
        warn!("{}", warning);
    }
    info!("Preflight checks passed");
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use migkit_iac::{IacError, RecordingRunner};

    #[test]
    fn test_missing_env_vars() {
        let missing = missing_env_vars(|name| {
            (name == "TF_VAR_spacelift_api_key_id").then(|| "01ABC".to_string())
        });
        assert_eq!(missing, vec!["TF_VAR_spacelift_api_key_secret"]);

        let none_missing = missing_env_vars(|_| Some("set".to_string()));
        assert!(none_missing.is_empty());

        let empty_counts_as_missing = missing_env_vars(|_| Some(String::new()));
        assert_eq!(empty_counts_as_missing.len(), 2);
    }

    #[test]
    fn test_preflight_requires_terraform() {
        let terraform = TerraformRunner::new(Arc::new(RecordingRunner::new().add_exit_code(127)));
        let err = preflight(&terraform).unwrap_err();
        assert!(matches!(err, CoreError::Iac(IacError::TerraformNotAvailable(_))));
    }
}
