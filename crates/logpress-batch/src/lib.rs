//! # logpress-batch
//!
//! Bounded-concurrency batch conversion of a directory of event logs.
//!
//! ## Features
//! - Order-stable discovery filtered by file extension
//! - Fixed-size windows of concurrent workers (default 100)
//! - Strict join per window: window *i* finishes before window *i + 1* starts
//! - Per-file and per-record failure isolation
//!
//! ## Usage
//! ```no_run
//! use logpress_batch::{BatchConfig, BatchEngine};
//! use logpress_core::XmlEventDecoder;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), logpress_core::ConfigError> {
//! let engine = BatchEngine::new(BatchConfig::new().worker_limit(8)?, Arc::new(XmlEventDecoder::new()));
//! let report = engine.run(std::path::Path::new("/var/log/sites")).await;
//! println!("{} rows", report.summary().rows_written);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discover;
pub mod engine;
pub mod report;

pub use config::BatchConfig;
pub use discover::{discover, output_path, plan_windows, Discovery};
pub use engine::BatchEngine;
pub use report::{BatchReport, BatchSummary, FileOutcome, FileReport, WindowReport};
