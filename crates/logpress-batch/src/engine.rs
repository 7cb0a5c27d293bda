//! `BatchEngine`: converts a directory of event logs in bounded windows.
//!
//! The eligible files are cut into windows of `worker_limit` files. Each
//! window runs one blocking task per file on a `JoinSet` and is joined in
//! full before the next window is dispatched, so at most `worker_limit`
//! files are ever in flight.

use crate::config::BatchConfig;
use crate::discover::{discover, output_path, plan_windows, Discovery};
use crate::report::{BatchReport, FileOutcome, FileReport, WindowReport};
use logpress_core::{convert_file, FileStats, RecordDecoder};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Batch conversion engine.
pub struct BatchEngine {
    config: BatchConfig,
    decoder: Arc<dyn RecordDecoder>,
}

impl BatchEngine {
    pub fn new(config: BatchConfig, decoder: Arc<dyn RecordDecoder>) -> Self {
        Self { config, decoder }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Convert every eligible file in `dir`.
    ///
    /// Never fails: per-file problems are logged and recorded in the
    /// returned report, and the run always continues to the last window.
    pub async fn run(&self, dir: &Path) -> BatchReport {
        let Discovery { eligible, skipped } = discover(dir, &self.config.extension);
        info!(
            "BatchEngine: {} files to convert in '{}' ({} skipped, worker_limit={})",
            eligible.len(),
            dir.display(),
            skipped.len(),
            self.config.worker_limit
        );

        let mut windows = Vec::new();
        for (index, window) in plan_windows(&eligible, self.config.worker_limit).enumerate() {
            windows.push(self.run_window(index, window).await);
        }

        let report = BatchReport { windows, skipped };
        let summary = report.summary();
        info!(
            "BatchEngine: complete, {} files converted, {} failed, {} rows written, {} records skipped, {} with unmapped content",
            summary.files_completed,
            summary.files_failed,
            summary.rows_written,
            summary.decode_failures,
            summary.drifted
        );
        report
    }

    /// Dispatch one window and wait for every task in it.
    async fn run_window(&self, index: usize, files: &[PathBuf]) -> WindowReport {
        debug!(window = index, files = files.len(), "dispatching window");

        let mut tasks = JoinSet::new();
        for (slot, input) in files.iter().enumerate() {
            let input = input.clone();
            let decoder = Arc::clone(&self.decoder);
            tasks.spawn_blocking(move || (slot, process_file(input, decoder.as_ref())));
        }

        let mut finished = Vec::with_capacity(files.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(done) => finished.push(done),
                Err(e) => error!(window = index, error = %e, "worker task could not be joined"),
            }
        }
        finished.sort_by_key(|(slot, _)| *slot);

        debug!(window = index, "window complete");
        WindowReport {
            index,
            files: finished.into_iter().map(|(_, report)| report).collect(),
        }
    }
}

/// Convert one file, turning every failure (panics included) into a report.
fn process_file(input: PathBuf, decoder: &dyn RecordDecoder) -> FileReport {
    let output = output_path(&input);
    let started_at = Instant::now();
    debug!(file = %input.display(), "currently processing file");

    let mut stats = FileStats::default();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        convert_file(&input, &output, decoder, &mut stats)
    }));

    let outcome = match result {
        Ok(Ok(())) => {
            debug!(file = %input.display(), rows = stats.rows_written, "finished processing");
            FileOutcome::Completed
        }
        Ok(Err(e)) => {
            error!(file = %input.display(), error = %e, "file conversion stopped");
            FileOutcome::Failed {
                reason: e.to_string(),
            }
        }
        Err(payload) => {
            let reason = panic_message(&*payload);
            error!(file = %input.display(), reason = %reason, "worker panicked");
            FileOutcome::Failed { reason }
        }
    };

    FileReport {
        input,
        output,
        stats,
        outcome,
        started_at,
        finished_at: Instant::now(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
