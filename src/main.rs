//! Command-line front end
//!
//! **Usage:**
//! ```bash
//! tone-sort classify <SOURCE> [--target DIR] [--clusters K] [--metric M] [--undo-log FILE]
//! tone-sort preview <SOURCE> [--clusters K] [--metric M] [--json]
//! tone-sort rollback <UNDO_LOG>
//! tone-sort init-config <FILE>
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tone_sort::{
    ClassificationEngine, ClassificationResult, ClassifierConfig, DistanceMetric, RollbackManager,
};

/// Sort photographs into folders by color character
#[derive(Parser, Debug)]
#[command(name = "tone-sort", version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify images and move them into one folder per cluster
    Classify {
        #[command(flatten)]
        run: RunArgs,

        /// Destination root for the category folders (defaults to SOURCE)
        #[arg(long, value_name = "DIR")]
        target: Option<PathBuf>,

        /// Where to write the undo log
        #[arg(long, value_name = "FILE")]
        undo_log: Option<PathBuf>,
    },

    /// Classify images without moving anything
    Preview {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Undo a previous classify run
    Rollback {
        /// Undo log written by `classify`
        undo_log: PathBuf,
    },

    /// Write the default configuration as JSON
    InitConfig {
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory to scan recursively
    source: PathBuf,

    /// Force the number of clusters instead of searching for it
    #[arg(long, short = 'k')]
    clusters: Option<usize>,

    /// Histogram distance: intersection, chi_square, bhattacharyya, correlation
    #[arg(long)]
    metric: Option<DistanceMetric>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Classify {
            run,
            target,
            undo_log,
        } => {
            let target = target.unwrap_or_else(|| run.source.clone());
            let mut engine = build_engine(&run)?;
            let result = engine
                .classify(&run.source, Some(&target), run.clusters)
                .with_context(|| format!("classifying {}", run.source.display()))?;

            let log = undo_log.unwrap_or_else(|| target.join(".tone-sort-undo.json"));
            engine
                .rollback_manager()
                .save(&log)
                .with_context(|| format!("writing undo log {}", log.display()))?;
            info!(log = %log.display(), "undo log written");

            report(&result, run.json)?;
        }
        Command::Preview { run } => {
            let mut engine = build_engine(&run)?;
            let result = engine
                .preview(&run.source, run.clusters)
                .with_context(|| format!("previewing {}", run.source.display()))?;
            report(&result, run.json)?;
        }
        Command::Rollback { undo_log } => {
            let mut manager = RollbackManager::load(&undo_log)
                .with_context(|| format!("loading undo log {}", undo_log.display()))?;
            let result = manager.rollback();
            println!(
                "Restored {} files, {} failed",
                result.success_count, result.failed_count
            );
            for path in &result.failed_files {
                println!("  failed: {}", path.display());
            }
            if result.failed_count == 0 {
                std::fs::remove_file(&undo_log)
                    .with_context(|| format!("removing {}", undo_log.display()))?;
            }
        }
        Command::InitConfig { file } => {
            ClassifierConfig::default()
                .to_json_file(&file)
                .with_context(|| format!("writing {}", file.display()))?;
            println!("Wrote default configuration to {}", file.display());
        }
    }

    Ok(())
}

fn build_engine(run: &RunArgs) -> Result<ClassificationEngine> {
    let config = match &run.config {
        Some(path) => load_config(path)?,
        None => ClassifierConfig::default(),
    };

    let mut engine = ClassificationEngine::with_config(config);
    if let Some(metric) = run.metric {
        engine.set_distance_metric(metric);
    }
    Ok(engine)
}

fn load_config(path: &Path) -> Result<ClassifierConfig> {
    ClassifierConfig::from_json_file(path)
        .with_context(|| format!("loading configuration {}", path.display()))
}

fn report(result: &ClassificationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "{} images in {} clusters (silhouette {:.3}) [{:.2}s]",
        result.total_images, result.n_clusters, result.silhouette_score, result.processing_time
    );
    for cluster in &result.clusters {
        println!("  {:<28} {:>5} images", cluster.name, cluster.member_count);
    }
    if !result.failed_images.is_empty() {
        println!("  skipped {} unreadable files", result.failed_images.len());
    }
    if !result.move_records.is_empty() {
        println!("  moved {} files", result.move_records.len());
    }
    Ok(())
}
