//! GitHub / GitHub Enterprise repository host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VcsError, VcsResult};
use crate::host::{
    endpoint, ensure_success, trim_base, HostSettings, NewRepository, RepositoryHost,
    VcsCredentials,
};
use crate::provider::VcsProvider;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github+json";

/// Creates repositories under the namespace: the token's own account when the
/// namespace is that user, otherwise the organization of that name.
pub struct GitHubHost {
    client: reqwest::Client,
    provider: VcsProvider,
    api_url: String,
    namespace: String,
    token: String,
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

#[derive(Deserialize)]
struct CreatedRepository {
    clone_url: Option<String>,
}

#[derive(Deserialize)]
struct AuthenticatedUser {
    login: String,
}

impl GitHubHost {
    /// GitHub Enterprise has no public default, so `api_url` is required there.
    pub fn new(
        client: reqwest::Client,
        settings: &HostSettings,
        credentials: &VcsCredentials,
    ) -> VcsResult<Self> {
        let api_url = match (&settings.api_url, settings.provider) {
            (Some(url), _) => trim_base(url),
            (None, VcsProvider::GitHubEnterprise) => return Err(settings.missing("vcs_api_url")),
            (None, _) => GITHUB_API_URL.to_string(),
        };

        Ok(Self {
            client,
            provider: settings.provider,
            api_url,
            namespace: settings.namespace.clone(),
            token: credentials.token.clone(),
        })
    }

    async fn authenticated_login(&self) -> VcsResult<String> {
        let response = self
            .client
            .get(endpoint(&self.api_url, &["user"])?)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .send()
            .await?;

        let user: AuthenticatedUser = ensure_success(self.provider, response).await?.json().await?;
        Ok(user.login)
    }

    /// `POST /user/repos` for the token's account, `POST /orgs/{org}/repos` otherwise.
    async fn create_url(&self) -> VcsResult<reqwest::Url> {
        if self.namespace.is_empty() {
            return endpoint(&self.api_url, &["user", "repos"]);
        }

        let login = self.authenticated_login().await?;
        if login.eq_ignore_ascii_case(&self.namespace) {
            endpoint(&self.api_url, &["user", "repos"])
        } else {
            debug!(%login, organization = %self.namespace, "Namespace is an organization");
            endpoint(&self.api_url, &["orgs", self.namespace.as_str(), "repos"])
        }
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    fn provider(&self) -> VcsProvider {
        self.provider
    }

    async fn create_repository(&self, repo: &NewRepository) -> VcsResult<String> {
        let url = self.create_url().await?;
        info!(provider = %self.provider, name = %repo.name, namespace = %self.namespace, "Creating repository");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .json(&CreateRepositoryRequest {
                name: &repo.name,
                description: &repo.description,
                private: repo.private,
                // Initialised so the default branch exists before the first push.
                auto_init: true,
            })
            .send()
            .await?;

        let created: CreatedRepository = ensure_success(self.provider, response).await?.json().await?;

        created
            .clone_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VcsError::MissingCloneUrl {
                provider: self.provider.to_string(),
            })
    }
}
