//! Login command - Authenticate Terraform with Spacelift and Terraform Cloud.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use migkit_iac::{ProcessRunner, TerraformRunner};

pub fn execute(root: &Path) -> Result<()> {
    let terraform = TerraformRunner::new(Arc::new(ProcessRunner::new()));
    terraform.ensure_available()?;

    info!("Starting Terraform login flows");
    println!("🔑 Logging in to Spacelift, then Terraform Cloud...");
    terraform
        .login_all(root)
        .context("Terraform login failed")?;

    println!("✅ Logged in to Spacelift and Terraform Cloud");
    Ok(())
}
