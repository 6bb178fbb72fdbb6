//! Repository host abstraction.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::azure::AzureDevOpsHost;
use crate::bitbucket::BitbucketHost;
use crate::error::{VcsError, VcsResult};
use crate::github::GitHubHost;
use crate::gitlab::GitLabHost;
use crate::provider::VcsProvider;

/// Description used when the configuration does not set one.
pub const DEFAULT_DESCRIPTION: &str = "This repository contains tfc migrated repositories";

/// Environment variable holding the provider token (or Bitbucket app password).
pub const TOKEN_ENV: &str = "VCS_TOKEN";

/// Environment variable holding the Bitbucket username.
pub const USERNAME_ENV: &str = "VCS_USERNAME";

/// Repository to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

impl NewRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            private: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }
}

/// Credentials for the provider API and Git transport.
#[derive(Clone)]
pub struct VcsCredentials {
    pub token: String,
    pub username: Option<String>,
}

impl std::fmt::Debug for VcsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcsCredentials")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl VcsCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Read `VCS_TOKEN` (required) and `VCS_USERNAME` (optional).
    pub fn from_env() -> VcsResult<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| VcsError::MissingCredential(format!("{TOKEN_ENV} is not set")))?;

        let username = std::env::var(USERNAME_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty());

        Ok(Self { token, username })
    }
}

/// Where and how to reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    pub provider: VcsProvider,
    /// GitHub/GitLab owner, Azure DevOps organization, default Bitbucket workspace.
    pub namespace: String,
    /// API base URL override (required for GitHub Enterprise).
    pub api_url: Option<String>,
    /// Bitbucket workspace or Azure DevOps project.
    pub workspace: Option<String>,
}

impl HostSettings {
    pub fn new(provider: VcsProvider, namespace: impl Into<String>) -> Self {
        Self {
            provider,
            namespace: namespace.into(),
            api_url: None,
            workspace: None,
        }
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub(crate) fn missing(&self, setting: &str) -> VcsError {
        VcsError::MissingSetting {
            provider: self.provider.to_string(),
            setting: setting.to_string(),
        }
    }
}

/// A provider that can create remote repositories.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Provider this host talks to.
    fn provider(&self) -> VcsProvider;

    /// Create the repository and return its HTTPS clone URL.
    async fn create_repository(&self, repo: &NewRepository) -> VcsResult<String>;
}

/// Build the [`RepositoryHost`] for the configured provider.
pub fn build_host(
    settings: &HostSettings,
    credentials: &VcsCredentials,
) -> VcsResult<Box<dyn RepositoryHost>> {
    let client = http_client()?;
    debug!(provider = %settings.provider, "Building repository host");

    let host: Box<dyn RepositoryHost> = match settings.provider {
        VcsProvider::GitHub | VcsProvider::GitHubEnterprise => {
            Box::new(GitHubHost::new(client, settings, credentials)?)
        }
        VcsProvider::GitLab => Box::new(GitLabHost::new(client, settings, credentials)),
        VcsProvider::AzureDevops => Box::new(AzureDevOpsHost::new(client, settings, credentials)?),
        VcsProvider::Bitbucket => Box::new(BitbucketHost::new(client, settings, credentials)?),
    };

    Ok(host)
}

pub(crate) fn http_client() -> VcsResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("migkit/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Turn a non-success response into [`VcsError::Api`].
pub(crate) async fn ensure_success(
    provider: VcsProvider,
    response: reqwest::Response,
) -> VcsResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%provider, %status, "repository creation rejected");
    Err(VcsError::Api {
        provider: provider.to_string(),
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Append `segments` to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> VcsResult<reqwest::Url> {
    let mut url = reqwest::Url::parse(base).map_err(|e| VcsError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| VcsError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint("https://api.bitbucket.org/2.0", &["repositories", "acme space", "infra#1?"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bitbucket.org/2.0/repositories/acme%20space/infra%231%3F"
        );

        let url = endpoint("http://127.0.0.1:8080", &["user", "repos"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/user/repos");

        assert!(matches!(endpoint("not a url", &["x"]), Err(VcsError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_repository_defaults() {
        let repo = NewRepository::new("tfc_migration");
        assert_eq!(repo.name, "tfc_migration");
        assert_eq!(repo.description, DEFAULT_DESCRIPTION);
        assert!(!repo.private);
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = VcsCredentials::new("ghp_secret").with_username("jdoe");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("jdoe"));
    }

    #[test]
    fn test_build_host_per_provider() {
        let creds = VcsCredentials::new("t").with_username("jdoe");
        for provider in VcsProvider::ALL {
            let settings = HostSettings::new(provider, "acme")
                .api_url("https://git.example.com/api/v3")
                .workspace("platform");
            let host = build_host(&settings, &creds).unwrap();
            assert_eq!(host.provider(), provider);
        }
    }

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("https://api.github.com/"), "https://api.github.com");
    }
}
