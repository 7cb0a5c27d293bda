//! Outcome of a batch run.

use logpress_core::FileStats;
use std::path::PathBuf;
use std::time::Instant;

/// How one file's conversion ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Every record was read; failed records were skipped.
    Completed,
    /// Conversion stopped early. Rows written before the failure are kept.
    Failed { reason: String },
}

/// Result of converting one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: FileStats,
    pub outcome: FileOutcome,
    pub started_at: Instant,
    pub finished_at: Instant,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.outcome == FileOutcome::Completed
    }
}

/// All files of one window, in input order.
#[derive(Debug, Clone)]
pub struct WindowReport {
    pub index: usize,
    pub files: Vec<FileReport>,
}

impl WindowReport {
    pub fn first_start(&self) -> Option<Instant> {
        self.files.iter().map(|f| f.started_at).min()
    }

    pub fn last_finish(&self) -> Option<Instant> {
        self.files.iter().map(|f| f.finished_at).max()
    }
}

/// Result of a whole batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub windows: Vec<WindowReport>,
    /// Files left out because of their extension
    pub skipped: Vec<PathBuf>,
}

/// Totals across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_completed: usize,
    pub files_failed: usize,
    pub files_skipped: usize,
    pub records: u64,
    pub rows_written: u64,
    pub decode_failures: u64,
    pub drifted: u64,
}

impl BatchReport {
    pub fn files(&self) -> impl Iterator<Item = &FileReport> {
        self.windows.iter().flat_map(|w| w.files.iter())
    }

    pub fn summary(&self) -> BatchSummary {
        let mut s = BatchSummary {
            files_skipped: self.skipped.len(),
            ..BatchSummary::default()
        };
        for file in self.files() {
            if file.is_success() {
                s.files_completed += 1;
            } else {
                s.files_failed += 1;
            }
            s.records += file.stats.records;
            s.rows_written += file.stats.rows_written;
            s.decode_failures += file.stats.decode_failures;
            s.drifted += file.stats.drifted;
        }
        s
    }
}
