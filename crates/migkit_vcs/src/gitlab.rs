//! GitLab repository host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VcsError, VcsResult};
use crate::host::{
    endpoint, ensure_success, trim_base, HostSettings, NewRepository, RepositoryHost,
    VcsCredentials,
};
use crate::provider::VcsProvider;

pub const GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// Creates projects in the namespace (user or group path) given by the settings.
pub struct GitLabHost {
    client: reqwest::Client,
    api_url: String,
    namespace: String,
    token: String,
}

#[derive(Serialize)]
struct CreateProjectRequest<'a> {
    name: &'a str,
    description: &'a str,
    visibility: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_id: Option<u64>,
}

#[derive(Deserialize)]
struct CreatedProject {
    http_url_to_repo: Option<String>,
}

#[derive(Deserialize)]
struct Namespace {
    id: u64,
    #[serde(default)]
    kind: String,
}

impl GitLabHost {
    pub fn new(client: reqwest::Client, settings: &HostSettings, credentials: &VcsCredentials) -> Self {
        Self {
            client,
            api_url: settings
                .api_url
                .as_deref()
                .map(trim_base)
                .unwrap_or_else(|| GITLAB_API_URL.to_string()),
            namespace: settings.namespace.clone(),
            token: credentials.token.clone(),
        }
    }

    /// Numeric id of the namespace; nested group paths are sent URL-encoded.
    async fn namespace_id(&self) -> VcsResult<Option<u64>> {
        if self.namespace.is_empty() {
            return Ok(None);
        }

        let response = self
            .client
            .get(endpoint(&self.api_url, &["namespaces", self.namespace.as_str()])?)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        let namespace: Namespace = ensure_success(VcsProvider::GitLab, response).await?.json().await?;
        debug!(id = namespace.id, kind = %namespace.kind, "Resolved GitLab namespace");
        Ok(Some(namespace.id))
    }
}

#[async_trait]
impl RepositoryHost for GitLabHost {
    fn provider(&self) -> VcsProvider {
        VcsProvider::GitLab
    }

    async fn create_repository(&self, repo: &NewRepository) -> VcsResult<String> {
        let namespace_id = self.namespace_id().await?;
        info!(provider = "gitlab", name = %repo.name, namespace = %self.namespace, "Creating project");

        let response = self
            .client
            .post(endpoint(&self.api_url, &["projects"])?)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&CreateProjectRequest {
                name: &repo.name,
                description: &repo.description,
                visibility: if repo.private { "private" } else { "public" },
                namespace_id,
            })
            .send()
            .await?;

        let created: CreatedProject = ensure_success(VcsProvider::GitLab, response).await?.json().await?;

        created
            .http_url_to_repo
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VcsError::MissingCloneUrl {
                provider: VcsProvider::GitLab.to_string(),
            })
    }
}
