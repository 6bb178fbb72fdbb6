//! Git operations for publishing generated code.
//!
//! Clones the freshly created repository over HTTPS with a token, drops the
//! generated file into it, commits and pushes. The token travels to git as an
//! `http.extraHeader` through `GIT_CONFIG_*` environment entries, so it never
//! appears in argv or in the clone's `.git/config`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

pub const COMMIT_AUTHOR_NAME: &str = "migkit";
pub const COMMIT_AUTHOR_EMAIL: &str = "migkit@users.noreply.localhost";

/// Basic-auth credential used for clone and push.
#[derive(Clone)]
pub struct GitCredential {
    pub username: String,
    pub token: String,
}

impl GitCredential {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    fn auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.token));
        format!("Authorization: Basic {encoded}")
    }
}

impl std::fmt::Debug for GitCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCredential")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Outcome of [`GitPublisher::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedCommit {
    pub checkout_dir: PathBuf,
    pub commit: String,
    pub branch: String,
}

/// Clones, commits and pushes with token authentication.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    credential: GitCredential,
}

impl GitPublisher {
    pub fn new(credential: GitCredential) -> Self {
        Self { credential }
    }

    /// Check if Git is available on the system.
    pub fn is_git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Clone `url` into `dest`, which must not exist or be empty.
    pub fn clone_repo(&self, url: &str, dest: &Path) -> CoreResult<()> {
        if dest.exists() && fs::read_dir(dest)?.next().is_some() {
            return Err(CoreError::GitError(format!(
                "clone destination {} is not empty; run with --clean first",
                dest.display()
            )));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        info!("Cloning {} into {}", url, dest.display());
        let dest_arg = dest.to_string_lossy();
        self.git(None, &["clone", url, &dest_arg], true)?;
        Ok(())
    }

    /// Copy `source` into the clone under its own file name.
    pub fn copy_into(&self, source: &Path, repo_dir: &Path) -> CoreResult<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            CoreError::GitError(format!("{} has no file name", source.display()))
        })?;
        let target = repo_dir.join(file_name);

        fs::copy(source, &target).map_err(|e| CoreError::CopyFailed {
            from: source.to_path_buf(),
            to: target.clone(),
            source: e,
        })?;

        debug!("Copied {:?} -> {:?}", source, target);
        Ok(target)
    }

    /// Stage everything and commit with the fixed author, timestamped now.
    ///
    /// Returns the new commit hash.
    pub fn commit_all(&self, repo_dir: &Path, message: &str) -> CoreResult<String> {
        self.git(Some(repo_dir), &["add", "--all"], false)?;

        // Git's internal date format: unix seconds plus offset.
        let now = format!("{} +0000", Utc::now().timestamp());
        let identity = format!("{COMMIT_AUTHOR_NAME} <{COMMIT_AUTHOR_EMAIL}>");
        let user_name = format!("user.name={COMMIT_AUTHOR_NAME}");
        let user_email = format!("user.email={COMMIT_AUTHOR_EMAIL}");

        let output = self
            .command(Some(repo_dir), false)
            .args(["-c", &user_name, "-c", &user_email, "-c", "commit.gpgsign=false"])
            .args(["commit", "--author", &identity, "-m", message])
            .env("GIT_AUTHOR_DATE", &now)
            .env("GIT_COMMITTER_DATE", &now)
            .output()
            .map_err(|e| CoreError::GitError(format!("Failed to commit: {}", e)))?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stdout.contains("nothing to commit") || stderr.contains("nothing to commit") {
                return Err(CoreError::GitError("Nothing to commit".to_string()));
            }
            return Err(CoreError::GitError(format!("git commit failed: {}", stderr)));
        }

        let hash_output = self.git(Some(repo_dir), &["rev-parse", "HEAD"], false)?;
        let hash = String::from_utf8_lossy(&hash_output.stdout).trim().to_string();
        info!("Committed {}", hash);
        Ok(hash)
    }

    /// Push `HEAD` to `branch` on `origin`.
    pub fn push(&self, repo_dir: &Path, branch: &str) -> CoreResult<()> {
        let refspec = format!("HEAD:refs/heads/{branch}");
        info!("Pushing to origin {}", branch);
        self.git(Some(repo_dir), &["push", "origin", &refspec], true)?;
        Ok(())
    }

    /// Clone, copy `artifact` in, commit and push to `branch`.
    pub fn publish(
        &self,
        url: &str,
        checkout_dir: &Path,
        artifact: &Path,
        branch: &str,
        message: &str,
    ) -> CoreResult<PublishedCommit> {
        self.clone_repo(url, checkout_dir)?;
        self.copy_into(artifact, checkout_dir)?;
        let commit = self.commit_all(checkout_dir, message)?;
        self.push(checkout_dir, branch)?;

        Ok(PublishedCommit {
            checkout_dir: checkout_dir.to_path_buf(),
            commit,
            branch: branch.to_string(),
        })
    }

    fn command(&self, dir: Option<&Path>, authenticated: bool) -> Command {
        let mut cmd = Command::new("git");
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        if authenticated {
            cmd.env("GIT_CONFIG_COUNT", "1")
                .env("GIT_CONFIG_KEY_0", "http.extraHeader")
                .env("GIT_CONFIG_VALUE_0", self.credential.auth_header());
        }
        cmd
    }

    fn git(&self, dir: Option<&Path>, args: &[&str], authenticated: bool) -> CoreResult<Output> {
        let verb = args.first().copied().unwrap_or("git");
        let output = self
            .command(dir, authenticated)
            .args(args)
            .output()
            .map_err(|e| CoreError::GitError(format!("Failed to run git {}: {}", verb, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CoreError::GitError(format!("git {} failed: {}", verb, stderr.trim())));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn publisher() -> GitPublisher {
        GitPublisher::new(GitCredential::new("x-access-token", "secret"))
    }

    #[test]
    fn test_auth_header() {
        let credential = GitCredential::new("user", "pass");
        assert_eq!(credential.auth_header(), "Authorization: Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let debug = format!("{:?}", GitCredential::new("user", "secret"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_copy_into() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("main.tf");
        let repo = temp_dir.path().join("repo");
        fs::write(&source, "resource \"x\" \"y\" {}\n").unwrap();
        fs::create_dir_all(&repo).unwrap();

        let target = publisher().copy_into(&source, &repo).unwrap();

        assert_eq!(target, repo.join("main.tf"));
        assert_eq!(fs::read_to_string(target).unwrap(), "resource \"x\" \"y\" {}\n");
    }

    #[test]
    fn test_copy_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = publisher()
            .copy_into(&temp_dir.path().join("main.tf"), temp_dir.path())
            .unwrap_err();
        assert!(matches!(err, CoreError::CopyFailed { .. }));
    }

    #[test]
    fn test_clone_refuses_non_empty_destination() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("leftover"), "x").unwrap();

        let err = publisher()
            .clone_repo("https://example.invalid/repo.git", temp_dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("not empty"));
    }

    #[test]
    fn test_publish_round_trip_to_bare_remote() {
        if !GitPublisher::is_git_available() {
            println!("Git not available, skipping test");
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let remote = temp_dir.path().join("remote.git");
        let status = Command::new("git")
            .args(["init", "--bare", "--quiet"])
            .arg(&remote)
            .status()
            .unwrap();
        assert!(status.success());

        let artifact = temp_dir.path().join("main.tf");
        fs::write(&artifact, "# generated\n").unwrap();
        let checkout = temp_dir.path().join("checkout");

        let published = publisher()
            .publish(
                &remote.to_string_lossy(),
                &checkout,
                &artifact,
                "main",
                "Initial commit",
            )
            .unwrap();

        assert_eq!(published.commit.len(), 40);
        let tree = Command::new("git")
            .arg("--git-dir")
            .arg(&remote)
            .args(["ls-tree", "--name-only", "main"])
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&tree.stdout), "main.tf\n");

        let author = Command::new("git")
            .arg("--git-dir")
            .arg(&remote)
            .args(["log", "-1", "--format=%an <%ae>", "main"])
            .output()
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&author.stdout).trim(),
            format!("{COMMIT_AUTHOR_NAME} <{COMMIT_AUTHOR_EMAIL}>")
        );
    }
}
