//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod analyze;
mod collect;
mod helpers;
mod visualize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "bilitrend")]
#[command(about = "Bilibili video metadata collection and trend analysis")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for analysis results
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Validate configuration and exit without touching network or disk
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Collect and enrich video metadata from the search API
    Collect {
        /// Re-collect even if an enriched data file already exists
        #[arg(long)]
        force_recollect: bool,
    },

    /// Analyze collected data and write the report
    Analyze,

    /// Export chart-ready data from the analysis report
    Visualize,

    /// Run collection, analysis, and chart export in sequence
    Full {
        /// Re-collect even if an enriched data file already exists
        #[arg(long)]
        force_recollect: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        settings.storage.output_dir = dir.clone();
    }
    settings.validate()?;

    if cli.dry_run {
        println!(
            "{} {} keywords, window {}, delay {}ms, results under {}",
            style("configuration ok:").green(),
            settings.keywords.len(),
            settings.date_range.describe(),
            settings.collection.request_delay_ms,
            settings.storage.output_dir.display()
        );
        return Ok(());
    }

    settings.ensure_directories()?;

    match cli.command {
        Commands::Collect { force_recollect } => {
            collect::cmd_collect(&settings, force_recollect).await
        }
        Commands::Analyze => analyze::cmd_analyze(&settings),
        Commands::Visualize => visualize::cmd_visualize(&settings),
        Commands::Full { force_recollect } => {
            collect::cmd_collect(&settings, force_recollect).await?;
            analyze::cmd_analyze(&settings)?;
            visualize::cmd_visualize(&settings)
        }
    }
}
