//! `CsvSink`: append-only CSV writer for flattened rows.

use crate::error::SinkError;
use crate::flatten::FlattenedRow;
use crate::schema::HEADER;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the header once, then one row per event, in arrival order.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner` and immediately write the header row.
    pub fn new(inner: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_row(&mut self, row: &FlattenedRow) -> Result<(), SinkError> {
        self.writer.write_record(row.values())?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flush every buffered byte and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

impl CsvSink<File> {
    /// Create (or truncate) the output file and write the header.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Self::new(file)
    }

    /// Flush and sync the file to stable storage.
    pub fn close(self) -> Result<(), SinkError> {
        let file = self.finish()?;
        file.sync_all()?;
        Ok(())
    }
}
