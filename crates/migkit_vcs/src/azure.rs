//! Azure DevOps repository host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{VcsError, VcsResult};
use crate::host::{endpoint, ensure_success, trim_base, HostSettings, NewRepository, RepositoryHost, VcsCredentials};
use crate::provider::VcsProvider;

pub const AZURE_DEVOPS_URL: &str = "https://dev.azure.com";
const API_VERSION: &str = "7.1";

/// Creates Git repositories inside an Azure DevOps project.
///
/// The organization comes from the namespace and the project from the
/// workspace setting. Repositories inherit the project's visibility, so the
/// description and private flag are not sent.
pub struct AzureDevOpsHost {
    client: reqwest::Client,
    base_url: String,
    organization: String,
    project: String,
    token: String,
}

#[derive(Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedRepository {
    remote_url: Option<String>,
}

impl AzureDevOpsHost {
    pub fn new(
        client: reqwest::Client,
        settings: &HostSettings,
        credentials: &VcsCredentials,
    ) -> VcsResult<Self> {
        let project = settings
            .workspace
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| settings.missing("vcs_workspace"))?;

        if settings.namespace.is_empty() {
            return Err(settings.missing("vcs_namespace"));
        }

        Ok(Self {
            client,
            base_url: settings
                .api_url
                .as_deref()
                .map(trim_base)
                .unwrap_or_else(|| AZURE_DEVOPS_URL.to_string()),
            organization: settings.namespace.clone(),
            project,
            token: credentials.token.clone(),
        })
    }
}

#[async_trait]
impl RepositoryHost for AzureDevOpsHost {
    fn provider(&self) -> VcsProvider {
        VcsProvider::AzureDevops
    }

    async fn create_repository(&self, repo: &NewRepository) -> VcsResult<String> {
        let mut url = endpoint(
            &self.base_url,
            &[self.organization.as_str(), self.project.as_str(), "_apis", "git", "repositories"],
        )?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        info!(provider = "azure_devops", name = %repo.name, project = %self.project, "Creating repository");
        debug!(private = repo.private, "visibility follows the project setting");

        let response = self
            .client
            .post(url)
            .basic_auth("", Some(&self.token))
            .json(&CreateRepositoryRequest { name: &repo.name })
            .send()
            .await?;

        let created: CreatedRepository = ensure_success(VcsProvider::AzureDevops, response)
            .await?
            .json()
            .await?;

        created
            .remote_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VcsError::MissingCloneUrl {
                provider: VcsProvider::AzureDevops.to_string(),
            })
    }
}
