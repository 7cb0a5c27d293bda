//! logpress CLI: convert every `.log` file in a directory into a sibling
//! `.log.csv` file.
//!
//! ```text
//! logpress --dir <path> [--workers <N>] [--debug] [--config <file.yaml>]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use logpress_batch::BatchEngine;
use logpress_core::XmlEventDecoder;
use logpress_observability::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

mod config;

use config::{Overrides, PressConfig};

#[derive(Parser)]
#[command(
    name = "logpress",
    about = "Convert NUL-delimited XML event logs to CSV",
    long_about = "
Converts every file with the configured extension (default: log) in the
input directory into a CSV file next to it (site.log -> site.log.csv).
Files are processed in windows of at most --workers files at a time.
",
    version
)]
struct Cli {
    /// Directory holding the event log files
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Maximum number of files converted concurrently (default: 100)
    #[arg(long)]
    workers: Option<usize>,

    /// Log per-file progress
    #[arg(long)]
    debug: bool,

    /// Write a CPU profile to this file (not supported by this build)
    #[arg(long)]
    cpuprofile: Option<PathBuf>,

    /// YAML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON structured logs
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn overrides(&mut self) -> Overrides {
        Overrides {
            input_directory: self.dir.take(),
            worker_limit: self.workers,
            debug: self.debug,
            profile_output: self.cpuprofile.take(),
            json_logs: self.json_logs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let mut press = match &cli.config {
        Some(path) => PressConfig::load(path)?,
        None => PressConfig::default(),
    };
    press.apply(cli.overrides());

    init_tracing(&press.log_config()).context("could not install log subscriber")?;

    let valid = press.validate()?;

    if let Some(path) = &press.profile_output {
        warn!(path = %path.display(), "CPU profiling is not supported by this build, continuing without it");
    }

    let engine = BatchEngine::new(valid.batch, Arc::new(XmlEventDecoder::new()));
    let report = engine.run(&valid.input_directory).await;

    let summary = report.summary();
    info!(
        completed = summary.files_completed,
        failed = summary.files_failed,
        skipped = summary.files_skipped,
        rows = summary.rows_written,
        "done"
    );
    Ok(())
}
