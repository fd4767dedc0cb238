//! macrowatch CLI binary.
//!
//! Runs the macro stress pipeline end to end or one stage at a time.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use macrowatch::{Pipeline, PipelineConfig, PipelineError, Result, latest_risk_summary};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "macrowatch")]
#[command(about = "US macro stress index and risk reporting from FRED data", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage in order (default)
    Run,

    /// Run a single stage
    Stage {
        /// Stage name (see `macrowatch stages`)
        name: String,
    },

    /// Print the executive summary of the latest month
    Summary,

    /// List stage names in run order
    Stages,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error ({}): {}", e.category(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;
    init_logging(cli.verbose, config.log_file.as_deref())?;

    let pipeline = Pipeline::default();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_all(&pipeline, &config)?,
        Commands::Stage { name } => {
            pipeline.run_stage(&name, &config)?;
            println!("Stage {} complete", name);
        }
        Commands::Summary => print!("{}", latest_risk_summary(&config)?),
        Commands::Stages => {
            for (position, stage) in pipeline.stages().enumerate() {
                println!("{:2}. {:10} {}", position + 1, stage.name(), stage.description());
            }
        }
    }

    Ok(())
}

fn run_all(pipeline: &Pipeline, config: &PipelineConfig) -> Result<()> {
    let pb = ProgressBar::new(pipeline.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );

    let result = pipeline.run_with(config, |position, stage| {
        pb.set_position(position as u64);
        pb.set_message(stage.description());
    });

    match result {
        Ok(()) => {
            pb.finish_with_message("done");
            info!("full pipeline executed successfully");
            println!("Reports written to {}", config.reports_dir.display());
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message(format!("failed at {}", e.stage().unwrap_or("?")));
            Err(e)
        }
    }
}

/// Log to stderr, and also to `log_file` (no colours) when configured.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PipelineError::Config(format!("{}: {}", parent.display(), e)))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .with(level)
        .try_init()
        .map_err(|e| PipelineError::Config(format!("logging: {}", e)))
}
