//! CLI command definitions.
//!
//! migkit is driven by flags rather than subcommands. When several are given
//! they run in a fixed order: `--clean` (then exit), `--login`, `--migrate`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

pub mod clean;
pub mod login;
pub mod migrate;

/// migkit - Terraform Cloud to Spacelift migration kit
#[derive(Parser, Debug)]
#[command(name = "migkit")]
#[command(version, about = "Migrate Terraform Cloud workspaces to Spacelift")]
#[command(long_about = r#"
migkit exports a Terraform Cloud organization, generates the equivalent
Spacelift configuration, publishes it to a new repository on your VCS
provider and creates a Spacelift manager stack that tracks it.

FLAGS IN ORDER:
  -c, --clean   → Remove generated output and Terraform state, then exit
  --login       → terraform login spacelift.io, then terraform login
  --migrate     → Run the full migration (asks for confirmation)

ENVIRONMENT:
  VCS_TOKEN                        Provider token (Bitbucket: app password)
  VCS_USERNAME                     Bitbucket username
  TF_VAR_spacelift_api_key_id      Spacelift API key id
  TF_VAR_spacelift_api_key_secret  Spacelift API key secret

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Aborted by operator
  4 - Template error
  5 - Terraform error
  6 - VCS error
"#)]
pub struct Cli {
    /// Remove generated artifacts and Terraform state to start a new migration
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Run the Spacelift and Terraform Cloud login flows
    #[arg(long)]
    pub login: bool,

    /// Start a migration
    #[arg(long)]
    pub migrate: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Migration kit root (holds config.yaml, templates and Terraform dirs)
    #[arg(long, env = "MIGKIT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file (defaults to <root>/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Whether any action flag was given.
    pub fn has_action(&self) -> bool {
        self.clean || self.login || self.migrate
    }
}

/// Run the selected actions in order.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.clean {
        return clean::execute(&cli.root);
    }

    if cli.login {
        login::execute(&cli.root)?;
    }

    if cli.migrate {
        migrate::execute(migrate::MigrateOptions {
            root: cli.root,
            config: cli.config,
            assume_yes: cli.yes,
            quiet: cli.quiet,
        })
        .await?;
    }

    Ok(())
}
