pub mod apply;
pub mod diff;
pub mod input;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::RowdiffConfig;
use crate::core::matching::DuplicatePolicy;
use crate::core::reconcile::DiffAlgorithm;
use crate::logging;

/// Keyed list reconciliation for JSON row files
#[derive(Debug, Parser)]
#[command(name = "rowdiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log reconciliation details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the edit script turning OLD into NEW
    Diff(diff::DiffArgs),

    /// Replay OLD -> NEW on an in-memory table and print the result
    Apply(apply::ApplyArgs),

    /// Print the effective configuration
    Config,
}

/// Row files and diff settings shared by `diff` and `apply`
#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// JSON array with the old rows
    pub old: PathBuf,

    /// JSON array with the new rows
    pub new: PathBuf,

    /// Field holding each row's identity key (default from config: "id")
    #[arg(short, long)]
    pub key: Option<String>,

    /// Algorithm deciding which rows moved
    #[arg(short, long, value_enum)]
    pub algorithm: Option<DiffAlgorithm>,

    /// Match repeated keys by first occurrence instead of failing
    #[arg(long)]
    pub allow_duplicates: bool,
}

impl InputArgs {
    /// Overlay command-line flags on the loaded configuration
    pub fn apply_to(&self, mut config: RowdiffConfig) -> RowdiffConfig {
        if let Some(key) = &self.key {
            config.diff.key_field = key.clone();
        }
        if let Some(algorithm) = self.algorithm {
            config.diff.algorithm = algorithm;
        }
        if self.allow_duplicates {
            config.diff.duplicates = DuplicatePolicy::FirstMatch;
        }
        config
    }
}

/// Load config for the current directory
pub fn load_config() -> Result<RowdiffConfig> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    RowdiffConfig::load(&cwd)
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Diff(args) => diff::run(args),
        Commands::Apply(args) => apply::run(args),
        Commands::Config => run_config(),
    }
}

fn run_config() -> Result<()> {
    let config = load_config()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
