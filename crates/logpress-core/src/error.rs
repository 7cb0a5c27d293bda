//! Error types for the logpress conversion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding a single record.
///
/// A decode error is always recoverable: the record is skipped and the
/// pipeline moves on to the next one.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: u64,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    #[error("expected element <event> but found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("record contains no root element")]
    MissingRoot,

    #[error("record ended inside <{open}>")]
    Truncated { open: String },
}

/// A non end-of-stream failure while reading records from a file.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("read failed at byte {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the CSV sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that end the processing of one input file.
///
/// These never escape the file they belong to: siblings in the same window
/// and later windows are unaffected.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: SinkError,
    },

    #[error("error reading events from '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StreamError,
    },

    #[error("error writing rows to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: SinkError,
    },
}

/// Run-level configuration errors. These abort before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no input directory given, there's nothing to do")]
    MissingInputDirectory,

    #[error("input directory '{}' is not a readable directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("worker limit must be a positive integer, got {value}")]
    InvalidWorkerLimit { value: usize },

    #[error("file extension must be non-empty and must not start with '.', got '{value}'")]
    InvalidExtension { value: String },

    #[error("could not read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}
