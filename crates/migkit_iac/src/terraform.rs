//! Terraform runner for local execution.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::command::TerraformCommand;
use crate::error::{IacError, IacResult};
use crate::process::{CommandRunner, ProcessSpec, StdioMode};

/// Terraform runner that shells out to the `terraform` binary.
#[derive(Clone)]
pub struct TerraformRunner {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl TerraformRunner {
    /// Create a new Terraform runner.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "terraform".to_string(),
        }
    }

    /// Use a different Terraform binary (e.g. an absolute path or `tofu`).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Check that `terraform version` runs.
    pub fn is_available(&self) -> bool {
        let spec = ProcessSpec::new(&self.binary)
            .args(["version"])
            .stdio(StdioMode::Silent);
        matches!(self.runner.run(&spec), Ok(0))
    }

    /// Fail with [`IacError::TerraformNotAvailable`] unless Terraform runs.
    pub fn ensure_available(&self) -> IacResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(IacError::TerraformNotAvailable(format!(
                "'{} version' did not succeed; is Terraform installed and on PATH?",
                self.binary
            )))
        }
    }

    /// Run a single Terraform command.
    ///
    /// `working_dir` is ignored for the login flows, which run in the caller's
    /// directory with the terminal attached.
    pub fn run(&self, working_dir: &Path, command: &TerraformCommand) -> IacResult<()> {
        let mut spec = ProcessSpec::new(&self.binary).args(command.args());

        if command.interactive() {
            spec = spec.stdio(StdioMode::Interactive);
        } else {
            if !working_dir.is_dir() {
                return Err(IacError::MissingWorkingDir(working_dir.display().to_string()));
            }
            spec = spec.working_dir(working_dir).stdio(StdioMode::Inherit);
        }

        info!("Running {} in {:?}", command, working_dir);
        let code = self.runner.run(&spec)?;

        if code != 0 {
            error!("{} exited with code {}", command, code);
            return Err(IacError::CommandFailed {
                command: command.to_string(),
                working_dir: working_dir.display().to_string(),
                code,
            });
        }

        debug!("{} ran successfully", command);
        Ok(())
    }

    /// `terraform init` followed by `terraform apply -auto-approve`.
    pub fn init_and_apply(&self, working_dir: &Path) -> IacResult<()> {
        self.run(working_dir, &TerraformCommand::Init)?;
        self.run(working_dir, &TerraformCommand::Apply)
    }

    /// `terraform init` followed by an apply fed with `var_file`.
    ///
    /// Terraform resolves `-var-file` against `working_dir`, so a relative
    /// `var_file` is made absolute from the current directory first.
    pub fn init_and_apply_generated(&self, working_dir: &Path, var_file: &Path) -> IacResult<()> {
        let var_file = std::path::absolute(var_file)?;
        self.run(working_dir, &TerraformCommand::Init)?;
        self.run(working_dir, &TerraformCommand::ApplyGenerated(var_file))
    }

    /// `terraform destroy -auto-approve`.
    pub fn destroy(&self, working_dir: &Path) -> IacResult<()> {
        self.run(working_dir, &TerraformCommand::Destroy)
    }

    /// Log in to Spacelift, then to Terraform Cloud.
    pub fn login_all(&self, working_dir: &Path) -> IacResult<()> {
        self.run(working_dir, &TerraformCommand::LoginSpacelift)?;
        self.run(working_dir, &TerraformCommand::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingRunner;
    use tempfile::tempdir;

    #[test]
    fn test_init_and_apply_sequence() {
        let dir = tempdir().unwrap();
        let recorder = RecordingRunner::new();
        let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

        terraform.init_and_apply(dir.path()).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args_line(), "init");
        assert_eq!(calls[1].args_line(), "apply -auto-approve");
        assert!(calls.iter().all(|c| c.working_dir.as_deref() == Some(dir.path())));
        assert!(calls.iter().all(|c| c.stdio == StdioMode::Inherit));
    }

    #[test]
    fn test_failed_init_stops_before_apply() {
        let dir = tempdir().unwrap();
        let recorder = RecordingRunner::new().add_exit_code(1);
        let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

        let err = terraform.init_and_apply(dir.path()).unwrap_err();

        assert!(matches!(err, IacError::CommandFailed { code: 1, .. }));
        assert!(err.to_string().contains("terraform init"));
        assert_eq!(recorder.call_count(), 1);
    }

    #[test]
    fn test_missing_working_dir() {
        let dir = tempdir().unwrap();
        let recorder = RecordingRunner::new();
        let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

        let err = terraform
            .run(&dir.path().join("nope"), &TerraformCommand::Init)
            .unwrap_err();

        assert!(matches!(err, IacError::MissingWorkingDir(_)));
        assert_eq!(recorder.call_count(), 0);
    }

    #[test]
    fn test_relative_var_file_is_made_absolute() {
        let dir = tempdir().unwrap();
        let recorder = RecordingRunner::new();
        let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

        terraform
            .init_and_apply_generated(dir.path(), Path::new("out/data.json"))
            .unwrap();

        let expected = std::env::current_dir().unwrap().join("out").join("data.json");
        assert_eq!(
            recorder.calls()[1].args.last().unwrap(),
            &format!("-var-file={}", expected.display())
        );
    }

    #[test]
    fn test_login_all_is_interactive() {
        let dir = tempdir().unwrap();
        let recorder = RecordingRunner::new();
        let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

        terraform.login_all(dir.path()).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls[0].args_line(), "login spacelift.io");
        assert_eq!(calls[1].args_line(), "login");
        assert!(calls.iter().all(|c| c.stdio == StdioMode::Interactive));
        assert!(calls.iter().all(|c| c.working_dir.is_none()));
    }

    #[test]
    fn test_availability_check() {
        let recorder = RecordingRunner::new().add_exit_code(127);
        let terraform = TerraformRunner::new(Arc::new(recorder.clone())).with_binary("tofu");

        let err = terraform.ensure_available().unwrap_err();
        assert!(matches!(err, IacError::TerraformNotAvailable(_)));
        assert_eq!(recorder.calls()[0].program, "tofu");
        assert_eq!(recorder.calls()[0].args_line(), "version");
    }
}
