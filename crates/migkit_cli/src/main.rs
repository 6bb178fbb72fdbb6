//! migkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Aborted by operator
//! - 4: Template error
//! - 5: Terraform error
//! - 6: VCS error

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::Cli;
use migkit_core::CoreError;
use migkit_iac::IacError;
use migkit_templates::TemplateError;
use migkit_vcs::VcsError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_CONFIG: u8 = 2;
    pub const ABORTED: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const TERRAFORM_ERROR: u8 = 5;
    pub const VCS_ERROR: u8 = 6;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        "migkit=debug"
    } else if cli.quiet {
        "migkit=warn"
    } else {
        "migkit=info"
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(level.parse().expect("static directive"))
                .add_directive("warn".parse().expect("static directive")),
        )
        .try_init();

    if !cli.has_action() {
        let _ = Cli::command().print_help();
        return ExitCode::from(ExitCodes::SUCCESS);
    }

    match commands::run(cli).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                CoreError::ConfigNotFound(_)
                | CoreError::InvalidConfig(_)
                | CoreError::UndefinedEnvVar(_)
                | CoreError::Yaml(_) => ExitCodes::INVALID_CONFIG,
                CoreError::Aborted => ExitCodes::ABORTED,
                CoreError::Preflight(_) => ExitCodes::TERRAFORM_ERROR,
                CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
                CoreError::Iac(_) => ExitCodes::TERRAFORM_ERROR,
                CoreError::Vcs(vcs) => vcs_exit_code(vcs),
                CoreError::GitError(_) | CoreError::CopyFailed { .. } => ExitCodes::VCS_ERROR,
                CoreError::Io(_) | CoreError::TaskFailed(_) => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<IacError>().is_some() {
            return ExitCodes::TERRAFORM_ERROR;
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
        if let Some(vcs) = cause.downcast_ref::<VcsError>() {
            return vcs_exit_code(vcs);
        }
    }
    ExitCodes::GENERAL_ERROR
}

fn vcs_exit_code(e: &VcsError) -> u8 {
    match e {
        VcsError::UnsupportedProvider(_)
        | VcsError::MissingCredential(_)
        | VcsError::MissingSetting { .. } => ExitCodes::INVALID_CONFIG,
        _ => ExitCodes::VCS_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes_by_error() {
        let aborted = anyhow::Error::new(CoreError::Aborted);
        assert_eq!(categorize_error(&aborted), ExitCodes::ABORTED);

        let terraform: anyhow::Result<()> = Err(CoreError::Iac(IacError::CommandFailed {
            command: "terraform apply -auto-approve".to_string(),
            working_dir: "exporters/tfc".to_string(),
            code: 1,
        }))
        .context("Migration failed");
        assert_eq!(categorize_error(&terraform.unwrap_err()), ExitCodes::TERRAFORM_ERROR);

        let provider = anyhow::Error::new(VcsError::UnsupportedProvider("svn".to_string()));
        assert_eq!(categorize_error(&provider), ExitCodes::INVALID_CONFIG);

        let api = anyhow::Error::new(CoreError::Vcs(VcsError::Api {
            provider: "gitlab".to_string(),
            status: 403,
            body: String::new(),
        }));
        assert_eq!(categorize_error(&api), ExitCodes::VCS_ERROR);

        let template = anyhow::Error::new(TemplateError::NotFound("x.tpl".into()));
        assert_eq!(categorize_error(&template), ExitCodes::TEMPLATE_ERROR);

        assert_eq!(categorize_error(&anyhow::anyhow!("boom")), ExitCodes::GENERAL_ERROR);
    }
}
