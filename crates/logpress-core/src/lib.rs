//! # logpress-core
//!
//! Core types and the per-file conversion pipeline shared by every logpress
//! crate: NUL-delimited record streaming, XML event decoding, flattening onto
//! the fixed column schema, and CSV output.

pub mod decoder;
pub mod error;
pub mod event;
pub mod flatten;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod sink;

mod xml;

pub use decoder::{RecordDecoder, XmlEventDecoder};
pub use error::{ConfigError, DecodeError, PipelineError, SinkError, StreamError};
pub use event::{Event, RawRecord};
pub use flatten::{flatten, FlattenedRow};
pub use pipeline::{convert, convert_file, FileStats};
pub use record::RecordStream;
pub use schema::{column_index, COLUMN_COUNT, HEADER};
pub use sink::CsvSink;
