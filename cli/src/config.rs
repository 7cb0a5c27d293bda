//! `PressConfig`: run settings from an optional YAML file plus CLI flags.

use logpress_batch::config::{DEFAULT_EXTENSION, DEFAULT_WORKER_LIMIT};
use logpress_batch::BatchConfig;
use logpress_core::ConfigError;
use logpress_observability::LogConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressConfig {
    #[serde(default)]
    pub input_directory: Option<PathBuf>,
    #[serde(default = "default_worker_limit")]
    pub worker_limit: usize,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub profile_output: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_worker_limit() -> usize {
    DEFAULT_WORKER_LIMIT
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            input_directory: None,
            worker_limit: default_worker_limit(),
            debug: false,
            profile_output: None,
            extension: default_extension(),
            log: LogConfig::default(),
        }
    }
}

/// Values given on the command line. `None`/`false` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_directory: Option<PathBuf>,
    pub worker_limit: Option<usize>,
    pub debug: bool,
    pub profile_output: Option<PathBuf>,
    pub json_logs: bool,
}

/// A configuration that passed validation.
#[derive(Debug, Clone)]
pub struct Validated {
    pub input_directory: PathBuf,
    pub batch: BatchConfig,
}

impl PressConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn apply(&mut self, flags: Overrides) {
        if flags.input_directory.is_some() {
            self.input_directory = flags.input_directory;
        }
        if let Some(n) = flags.worker_limit {
            self.worker_limit = n;
        }
        if flags.profile_output.is_some() {
            self.profile_output = flags.profile_output;
        }
        self.debug |= flags.debug;
        self.log.json |= flags.json_logs;
    }

    /// Logging settings with `debug` folded into the global level.
    pub fn log_config(&self) -> LogConfig {
        let mut log = self.log.clone();
        if self.debug {
            log.level = "debug".to_string();
        }
        log
    }

    pub fn validate(&self) -> Result<Validated, ConfigError> {
        let dir = match &self.input_directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => return Err(ConfigError::MissingInputDirectory),
        };
        if !dir.is_dir() {
            return Err(ConfigError::NotADirectory { path: dir.clone() });
        }
        let batch = BatchConfig::new()
            .worker_limit(self.worker_limit)?
            .extension(self.extension.clone())?;
        Ok(Validated {
            input_directory: dir.clone(),
            batch,
        })
    }
}
