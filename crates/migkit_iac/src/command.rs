//! Terraform verbs used by the migration.

use std::fmt;
use std::path::PathBuf;

/// Host passed to `terraform login` for the Spacelift flow.
pub const SPACELIFT_LOGIN_HOST: &str = "spacelift.io";

/// A single Terraform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerraformCommand {
    /// `terraform init`
    Init,
    /// `terraform apply -auto-approve`
    Apply,
    /// `terraform apply -auto-approve -var-file=<path>`, fed by the export data file.
    ApplyGenerated(PathBuf),
    /// `terraform destroy -auto-approve`
    Destroy,
    /// `terraform login` against Terraform Cloud.
    Login,
    /// `terraform login spacelift.io`
    LoginSpacelift,
}

impl TerraformCommand {
    /// Build the argument vector passed to the `terraform` binary.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Init => vec!["init".to_string()],
            Self::Apply => vec!["apply".to_string(), "-auto-approve".to_string()],
            Self::ApplyGenerated(var_file) => vec![
                "apply".to_string(),
                "-auto-approve".to_string(),
                format!("-var-file={}", var_file.display()),
            ],
            Self::Destroy => vec!["destroy".to_string(), "-auto-approve".to_string()],
            Self::Login => vec!["login".to_string()],
            Self::LoginSpacelift => vec!["login".to_string(), SPACELIFT_LOGIN_HOST.to_string()],
        }
    }

    /// Login flows need the operator's terminal for the token prompt.
    pub fn interactive(&self) -> bool {
        matches!(self, Self::Login | Self::LoginSpacelift)
    }

    /// Whether the command has to run inside a Terraform configuration directory.
    pub fn needs_working_dir(&self) -> bool {
        !self.interactive()
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terraform {}", self.args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_destroy_auto_approve() {
        assert_eq!(TerraformCommand::Apply.args(), vec!["apply", "-auto-approve"]);
        assert_eq!(TerraformCommand::Destroy.args(), vec!["destroy", "-auto-approve"]);
    }

    #[test]
    fn test_apply_generated_references_var_file() {
        let cmd = TerraformCommand::ApplyGenerated(PathBuf::from("/work/out/data.json"));
        assert_eq!(
            cmd.args(),
            vec!["apply", "-auto-approve", "-var-file=/work/out/data.json"]
        );
    }

    #[test]
    fn test_login_variants() {
        assert_eq!(TerraformCommand::Login.args(), vec!["login"]);
        assert_eq!(
            TerraformCommand::LoginSpacelift.args(),
            vec!["login", "spacelift.io"]
        );
        assert!(TerraformCommand::Login.interactive());
        assert!(TerraformCommand::LoginSpacelift.interactive());
        assert!(!TerraformCommand::Init.interactive());
    }

    #[test]
    fn test_display() {
        assert_eq!(TerraformCommand::Init.to_string(), "terraform init");
        assert_eq!(
            TerraformCommand::Apply.to_string(),
            "terraform apply -auto-approve"
        );
    }
}
