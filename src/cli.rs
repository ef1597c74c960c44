//! CLI argument parsing module for requp

use crate::error::ConfigError;
use crate::registry::{IndexConfig, DEFAULT_JSON_REPO, DEFAULT_SIMPLE_REPO};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Requirements file dependency checker and updater
#[derive(Parser, Debug, Clone)]
#[command(name = "requp", version, about = "Checks a requirements file for outdated versions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check a requirements file for out of date versions
    Check(CheckArgs),
    /// Interactively update pinned versions in a requirements file
    Update(UpdateArgs),
}

/// Index endpoint selection, shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Repository URL for the JSON API
    #[arg(short = 'j', long, value_name = "URL", default_value = DEFAULT_JSON_REPO)]
    pub json_repo: String,

    /// Repository URL for the Simple API
    #[arg(short = 's', long, value_name = "URL", default_value = DEFAULT_SIMPLE_REPO)]
    pub simple_repo: String,

    /// Only use the JSON API to look up versions
    #[arg(short = 'J', long)]
    pub json_only: bool,

    /// Only use the Simple API to look up versions
    #[arg(short = 'S', long)]
    pub simple_only: bool,
}

impl IndexArgs {
    /// Rejects contradictory API restrictions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json_only && self.simple_only {
            return Err(ConfigError::ConflictingOptions {
                message: "--simple-only and --json-only cannot both be set".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the index configuration for the registry layer
    pub fn to_config(&self) -> IndexConfig {
        IndexConfig {
            json_repo: self.json_repo.clone(),
            simple_repo: self.simple_repo.clone(),
            json_only: self.json_only,
            simple_only: self.simple_only,
        }
    }
}

/// Arguments for the check subcommand
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the requirements file
    pub manifest: PathBuf,

    /// Show all package statuses, including skipped and up to date
    #[arg(short, long)]
    pub verbose: bool,

    /// Show likely package changelog/info links
    #[arg(short, long)]
    pub info: bool,

    /// Disable styled output
    #[arg(long)]
    pub boring: bool,

    /// Warn when a package version is not pinned
    #[arg(short = 'p', long)]
    pub pin_warn: bool,

    #[command(flatten)]
    pub index: IndexArgs,
}

/// Arguments for the update subcommand
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Path to the requirements file
    pub manifest: PathBuf,

    /// Disable styled output
    #[arg(long)]
    pub boring: bool,

    /// Also pin unpinned packages to the latest version
    #[arg(short = 'p', long)]
    pub pin: bool,

    /// Apply all updates without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    #[command(flatten)]
    pub index: IndexArgs,
}
