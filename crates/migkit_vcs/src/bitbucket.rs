//! Bitbucket Cloud repository host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{VcsError, VcsResult};
use crate::host::{endpoint, ensure_success, trim_base, HostSettings, NewRepository, RepositoryHost, VcsCredentials};
use crate::provider::VcsProvider;

pub const BITBUCKET_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Authenticates with username + app password; repositories live in a workspace.
pub struct BitbucketHost {
    client: reqwest::Client,
    api_url: String,
    workspace: String,
    username: String,
    app_password: String,
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    scm: &'static str,
    is_private: bool,
    description: &'a str,
}

#[derive(Deserialize)]
struct CreatedRepository {
    #[serde(default)]
    links: RepositoryLinks,
}

#[derive(Deserialize, Default)]
struct RepositoryLinks {
    #[serde(default, rename = "clone")]
    clone_links: Vec<CloneLink>,
}

#[derive(Deserialize)]
struct CloneLink {
    name: String,
    href: String,
}

impl BitbucketHost {
    /// The workspace defaults to the namespace when not set explicitly.
    pub fn new(
        client: reqwest::Client,
        settings: &HostSettings,
        credentials: &VcsCredentials,
    ) -> VcsResult<Self> {
        let username = credentials
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                VcsError::MissingCredential(
                    "bitbucket requires a username (vcs_username or VCS_USERNAME)".to_string(),
                )
            })?;

        let workspace = settings
            .workspace
            .clone()
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| settings.namespace.clone());
        if workspace.is_empty() {
            return Err(settings.missing("vcs_workspace"));
        }

        Ok(Self {
            client,
            api_url: settings
                .api_url
                .as_deref()
                .map(trim_base)
                .unwrap_or_else(|| BITBUCKET_API_URL.to_string()),
            workspace,
            username,
            app_password: credentials.token.clone(),
        })
    }
}

/// Pick the `https` entry out of the clone link collection.
fn https_clone_url(links: &RepositoryLinks) -> Option<String> {
    links
        .clone_links
        .iter()
        .find(|link| link.name == "https")
        .map(|link| link.href.clone())
}

#[async_trait]
impl RepositoryHost for BitbucketHost {
    fn provider(&self) -> VcsProvider {
        VcsProvider::Bitbucket
    }

    async fn create_repository(&self, repo: &NewRepository) -> VcsResult<String> {
        let url = endpoint(&self.api_url, &["repositories", self.workspace.as_str(), repo.name.as_str()])?;
        info!(provider = "bitbucket", name = %repo.name, workspace = %self.workspace, "Creating repository");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(&CreateRepositoryRequest {
                scm: "git",
                is_private: repo.private,
                description: &repo.description,
            })
            .send()
            .await?;

        let created: CreatedRepository = ensure_success(VcsProvider::Bitbucket, response)
            .await?
            .json()
            .await?;

        https_clone_url(&created.links).ok_or_else(|| VcsError::MissingCloneUrl {
            provider: VcsProvider::Bitbucket.to_string(),
        })
    }
}
