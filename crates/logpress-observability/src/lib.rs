//! # logpress-observability
//!
//! Structured logging for logpress.
//!
//! Human-readable or JSON output through `tracing-subscriber`, with a global
//! level and optional per-crate overrides, e.g. `logpress_core=warn` to mute
//! per-record decode warnings during a large run.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
