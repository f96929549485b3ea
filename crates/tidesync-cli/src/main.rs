use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tidesync_core::{export, run_alignment, DatasetConfig, SourceStatus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Assembles synchronized hourly datasets from raw measurement files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resample, merge and gap-fill the configured sources, then write the
    /// final feature table as CSV.
    Build {
        /// Path to a TOML dataset config.
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build { config } => build(&config),
    }
}

fn build(config_path: &PathBuf) -> Result<()> {
    let config = DatasetConfig::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let output = run_alignment(&config)?;

    let mut resampled = 0;
    let mut skipped = 0;
    for outcome in &output.outcomes {
        match &outcome.status {
            SourceStatus::Resampled { rows, columns } => {
                resampled += 1;
                info!(
                    source = %outcome.path.display(),
                    rows,
                    columns = columns.len(),
                    "source included"
                );
            }
            SourceStatus::Skipped(reason) => {
                skipped += 1;
                warn!(source = %outcome.path.display(), %reason, "source skipped");
            }
        }
    }
    for column in &output.dropped_columns {
        warn!(%column, "dropped all-missing column");
    }

    export::write_csv(&output.frame, &config.output_path)?;

    info!(
        output = %config.output_path.display(),
        rows = output.frame.height(),
        columns = output.frame.width(),
        sources_included = resampled,
        sources_skipped = skipped,
        "dataset written"
    );
    Ok(())
}
