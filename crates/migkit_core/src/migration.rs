//! Top-level migration sequence.
//!
//! Once the operator has confirmed and the configuration is loaded, the
//! migration runs a fixed, linear list of [`MigrationStep`]s. The first failing
//! step ends the run; nothing already done is rolled back, so a repository
//! created before a later failure stays on the provider.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use migkit_iac::TerraformRunner;
use migkit_templates::TemplateRenderer;
use migkit_vcs::RepositoryHost;

use crate::config::MigrationConfig;
use crate::error::{CoreError, CoreResult};
use crate::git::GitPublisher;
use crate::layout::MigrationLayout;
use crate::settings::{ExporterSettings, ManagerStackSettings};

pub const COMMIT_MESSAGE: &str = "Initial commit for the TFC migration";

/// Steps of a migration, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    RenderExporterVars,
    ApplyExporter,
    ApplyGenerator,
    CreateRepository,
    CloneRepository,
    CopyArtifact,
    CommitAndPush,
    RenderManagerVars,
    ApplyManagerStack,
}

impl MigrationStep {
    pub const ALL: [MigrationStep; 9] = [
        Self::RenderExporterVars,
        Self::ApplyExporter,
        Self::ApplyGenerator,
        Self::CreateRepository,
        Self::CloneRepository,
        Self::CopyArtifact,
        Self::CommitAndPush,
        Self::RenderManagerVars,
        Self::ApplyManagerStack,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::RenderExporterVars => "Render exporter variables",
            Self::ApplyExporter => "Export Terraform Cloud data",
            Self::ApplyGenerator => "Generate Spacelift code",
            Self::CreateRepository => "Create destination repository",
            Self::CloneRepository => "Clone destination repository",
            Self::CopyArtifact => "Copy generated code",
            Self::CommitAndPush => "Commit and push",
            Self::RenderManagerVars => "Render manager stack variables",
            Self::ApplyManagerStack => "Create manager stack",
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What a completed migration produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub clone_url: String,
    pub checkout_dir: PathBuf,
    pub commit: String,
    pub completed: Vec<MigrationStep>,
}

/// Drives a migration from rendered exporter variables to the manager stack.
pub struct Migration {
    config: MigrationConfig,
    layout: MigrationLayout,
    terraform: TerraformRunner,
    host: Box<dyn RepositoryHost>,
    publisher: GitPublisher,
    renderer: TemplateRenderer,
}

impl Migration {
    pub fn new(
        config: MigrationConfig,
        layout: MigrationLayout,
        terraform: TerraformRunner,
        host: Box<dyn RepositoryHost>,
        publisher: GitPublisher,
    ) -> Self {
        Self {
            config,
            layout,
            terraform,
            host,
            publisher,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Terraform, git and file steps run on the blocking thread pool; only
    /// repository creation runs on the async runtime.
    pub async fn run(&self) -> CoreResult<MigrationReport> {
        let mut completed = Vec::with_capacity(MigrationStep::ALL.len());
        let checkout_dir = self.layout.checkout_dir(&self.config.repo_name);

        let (renderer, layout) = (self.renderer.clone(), self.layout.clone());
        let settings = ExporterSettings::from_config(&self.config);
        self.blocking_step(MigrationStep::RenderExporterVars, &mut completed, move || {
            renderer.render_file(&layout.exporter_template(), &layout.exporter_tfvars(), &settings)?;
            Ok(())
        })
        .await?;

        let (terraform, layout) = (self.terraform.clone(), self.layout.clone());
        self.blocking_step(MigrationStep::ApplyExporter, &mut completed, move || {
            Ok(terraform.init_and_apply(&layout.exporter_dir())?)
        })
        .await?;

        let (terraform, layout) = (self.terraform.clone(), self.layout.clone());
        self.blocking_step(MigrationStep::ApplyGenerator, &mut completed, move || {
            Ok(terraform.init_and_apply_generated(&layout.generator_dir(), &layout.export_data_file())?)
        })
        .await?;

        info!(step = %MigrationStep::CreateRepository, provider = %self.host.provider(), "Starting step");
        let clone_url = match self.host.create_repository(&self.config.new_repository()).await {
            Ok(url) => url,
            Err(e) => {
                error!(step = %MigrationStep::CreateRepository, "Step failed: {}", e);
                return Err(e.into());
            }
        };
        info!(step = %MigrationStep::CreateRepository, %clone_url, "Step completed");
        completed.push(MigrationStep::CreateRepository);

        let (publisher, url, dest) = (self.publisher.clone(), clone_url.clone(), checkout_dir.clone());
        self.blocking_step(MigrationStep::CloneRepository, &mut completed, move || {
            publisher.clone_repo(&url, &dest)
        })
        .await?;

        let (publisher, artifact, dest) = (
            self.publisher.clone(),
            self.layout.generated_artifact(),
            checkout_dir.clone(),
        );
        self.blocking_step(MigrationStep::CopyArtifact, &mut completed, move || {
            publisher.copy_into(&artifact, &dest).map(|_| ())
        })
        .await?;

        let (publisher, dest) = (self.publisher.clone(), checkout_dir.clone());
        let branch = self.config.vcs_default_branch.clone();
        let commit = self
            .blocking_step(MigrationStep::CommitAndPush, &mut completed, move || {
                let commit = publisher.commit_all(&dest, COMMIT_MESSAGE)?;
                publisher.push(&dest, &branch)?;
                Ok(commit)
            })
            .await?;

        let (renderer, layout) = (self.renderer.clone(), self.layout.clone());
        let settings = ManagerStackSettings::from_config(&self.config, &clone_url);
        self.blocking_step(MigrationStep::RenderManagerVars, &mut completed, move || {
            renderer.render_file(&layout.manager_template(), &layout.manager_tfvars(), &settings)?;
            Ok(())
        })
        .await?;

        let (terraform, layout) = (self.terraform.clone(), self.layout.clone());
        self.blocking_step(MigrationStep::ApplyManagerStack, &mut completed, move || {
            Ok(terraform.init_and_apply(&layout.manager_dir())?)
        })
        .await?;

        Ok(MigrationReport {
            clone_url,
            checkout_dir,
            commit,
            completed,
        })
    }

    async fn blocking_step<T, F>(
        &self,
        step: MigrationStep,
        completed: &mut Vec<MigrationStep>,
        action: F,
    ) -> CoreResult<T>
    where
        F: FnOnce() -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        info!(step = %step, "Starting step");
        let result = match tokio::task::spawn_blocking(action).await {
            Ok(result) => result,
            Err(e) => Err(CoreError::TaskFailed(format!("{step}: {e}"))),
        };

        match result {
            Ok(value) => {
                info!(step = %step, "Step completed");
                completed.push(step);
                Ok(value)
            }
            Err(e) => {
                error!(step = %step, "Step failed: {}", e);
                Err(e)
            }
        }
    }
}
