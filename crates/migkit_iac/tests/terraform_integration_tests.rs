//! Integration tests for Terraform invocation.

use std::path::Path;
use std::sync::Arc;

use migkit_iac::{IacError, RecordingRunner, TerraformCommand, TerraformRunner};
use tempfile::tempdir;

#[test]
fn test_generated_apply_uses_var_file() {
    let dir = tempdir().unwrap();
    let generator = dir.path().join("generator");
    std::fs::create_dir_all(&generator).unwrap();
    let var_file = dir.path().join("out").join("data.json");

    let recorder = RecordingRunner::new();
    let terraform = TerraformRunner::new(Arc::new(recorder.clone()));
    terraform
        .init_and_apply_generated(&generator, &var_file)
        .unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args, vec!["init"]);
    assert_eq!(
        calls[1].args,
        vec![
            "apply".to_string(),
            "-auto-approve".to_string(),
            format!("-var-file={}", var_file.display()),
        ]
    );
}

#[test]
fn test_destroy_auto_approves() {
    let dir = tempdir().unwrap();
    let recorder = RecordingRunner::new();
    let terraform = TerraformRunner::new(Arc::new(recorder.clone()));

    terraform.destroy(dir.path()).unwrap();

    assert_eq!(recorder.calls()[0].args_line(), "destroy -auto-approve");
}

#[test]
fn test_every_apply_variant_auto_approves() {
    for command in [
        TerraformCommand::Apply,
        TerraformCommand::Destroy,
        TerraformCommand::ApplyGenerated(Path::new("out/data.json").to_path_buf()),
    ] {
        assert!(
            command.args().iter().any(|a| a == "-auto-approve"),
            "{command} is missing -auto-approve"
        );
    }
}

#[cfg(unix)]
mod with_fake_binary {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use migkit_iac::ProcessRunner;

    fn fake_terraform(dir: &Path, exit_code: i32) -> String {
        let script = dir.join("terraform");
        fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" >> calls.log\nexit {exit_code}\n"),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script.display().to_string()
    }

    // All scenarios share one test so only one thread forks while scripts are written.
    #[test]
    fn test_process_runner_exit_codes() {
        let ok_dir = tempdir().unwrap();
        let binary = fake_terraform(ok_dir.path(), 0);
        let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new())).with_binary(binary);

        terraform.init_and_apply(ok_dir.path()).unwrap();

        let log = fs::read_to_string(ok_dir.path().join("calls.log")).unwrap();
        assert_eq!(log, "init\napply -auto-approve\n");

        let failing_dir = tempdir().unwrap();
        let binary = fake_terraform(failing_dir.path(), 2);
        let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new())).with_binary(binary);

        let err = terraform
            .run(failing_dir.path(), &TerraformCommand::Init)
            .unwrap_err();

        match err {
            IacError::CommandFailed { command, code, .. } => {
                assert_eq!(command, "terraform init");
                assert_eq!(code, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        generated_apply_from_relative_root();
    }

    /// Terraform runs inside the generator directory; the var-file handed to
    /// it must still exist from there when the kit root is given relatively.
    fn generated_apply_from_relative_root() {
        // Created under the test's working directory so it can be named relatively.
        let kit = tempfile::tempdir_in(".").unwrap();
        let relative_root = Path::new(kit.path().file_name().unwrap());
        assert!(relative_root.is_relative());

        let generator = relative_root.join("generator");
        let out = relative_root.join("out");
        fs::create_dir_all(&generator).unwrap();
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("data.json"), "{}").unwrap();

        let script = kit.path().join("terraform");
        fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"apply\" ]; then\n  test -f \"${3#-var-file=}\" || exit 9\nfi\nexit 0\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let binary = fs::canonicalize(&script).unwrap();

        let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new()))
            .with_binary(binary.display().to_string());

        terraform
            .init_and_apply_generated(&generator, &out.join("data.json"))
            .unwrap();
    }
}
