//! Batch run configuration.

use logpress_core::ConfigError;
use std::num::NonZeroUsize;

/// Default ceiling on concurrently processed files.
pub const DEFAULT_WORKER_LIMIT: usize = 100;
/// Default recognised input file extension.
pub const DEFAULT_EXTENSION: &str = "log";
/// Suffix appended to an input file name to form its output name.
pub const OUTPUT_SUFFIX: &str = "csv";

/// Configuration for a batch conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Window size: how many files are processed concurrently
    pub worker_limit: NonZeroUsize,
    /// Only files with this extension (no leading dot) are converted
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            worker_limit: NonZeroUsize::new(DEFAULT_WORKER_LIMIT).unwrap_or(NonZeroUsize::MIN),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn worker_limit(mut self, n: usize) -> Result<Self, ConfigError> {
        self.worker_limit =
            NonZeroUsize::new(n).ok_or(ConfigError::InvalidWorkerLimit { value: n })?;
        Ok(self)
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Result<Self, ConfigError> {
        let ext = ext.into();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::InvalidExtension { value: ext });
        }
        self.extension = ext;
        Ok(self)
    }
}
