//! Migrate command - Run the full Terraform Cloud to Spacelift migration.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use migkit_core::{
    confirm, preflight, GitCredential, GitPublisher, Migration, MigrationConfig,
    MigrationLayout, MigrationReport,
};
use migkit_iac::{ProcessRunner, TerraformRunner};
use migkit_vcs::{build_host, VcsCredentials};

pub struct MigrateOptions {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub assume_yes: bool,
    pub quiet: bool,
}

pub async fn execute(options: MigrateOptions) -> Result<()> {
    if !options.assume_yes {
        confirm(io::stdin().lock(), io::stdout())?;
    }

    let layout = MigrationLayout::resolve(&options.root)
        .with_context(|| format!("Failed to resolve {}", options.root.display()))?;
    let config_path = options.config.unwrap_or_else(|| layout.config_file());
    let config = MigrationConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let provider = config.provider()?;

    info!(
        organization = %config.tfc_organization,
        %provider,
        repository = %config.repo_name,
        "Starting migration"
    );

    let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new()));
    let warnings = preflight(&terraform)?;
    if !options.quiet {
        for warning in &warnings {
            println!("⚠️  {}", warning);
        }
    }

    let credentials = config.apply_username(VcsCredentials::from_env()?);
    let host = build_host(&config.host_settings()?, &credentials)?;
    let git_username = provider.git_username(credentials.username.as_deref());
    let publisher = GitPublisher::new(GitCredential::new(git_username, &credentials.token));

    println!(
        "🚚 Migrating {} to Spacelift account {}...",
        config.tfc_organization, config.spacelift_account
    );

    let report = Migration::new(config, layout, terraform, host, publisher)
        .run()
        .await
        .context("Migration failed")?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &MigrationReport) {
    println!();
    println!("✅ Migration completed");
    for step in &report.completed {
        println!("   ✓ {}", step);
    }
    println!();
    println!("Repository: {}", report.clone_url);
    println!("Local clone: {}", report.checkout_dir.display());
    println!("Commit:     {}", report.commit);
}
