//! Per-file conversion: RecordStream → RecordDecoder → flatten → CsvSink.
//!
//! Record-level failures are logged and skipped. File-level failures stop
//! this file only; whatever was already written is flushed and kept.

use crate::decoder::RecordDecoder;
use crate::error::{PipelineError, SinkError};
use crate::flatten::flatten;
use crate::record::RecordStream;
use crate::sink::CsvSink;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, error, warn};

/// Counters for one converted file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Records read from the input
    pub records: u64,
    /// Rows written to the output (excluding the header)
    pub rows_written: u64,
    /// Records skipped because they failed to decode
    pub decode_failures: u64,
    /// Rows whose event carried unmapped content
    pub drifted: u64,
}

/// Convert every record from `reader` into rows on `sink`.
///
/// `source` only labels diagnostics and errors. On a read or write error
/// the function returns early; the caller still owns `sink` and is
/// expected to finish it.
pub fn convert<R: BufRead, W: Write>(
    reader: R,
    sink: &mut CsvSink<W>,
    decoder: &dyn RecordDecoder,
    source: &Path,
    stats: &mut FileStats,
) -> Result<(), PipelineError> {
    for record in RecordStream::new(reader) {
        let record = record.map_err(|source_err| PipelineError::Read {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        stats.records += 1;

        let event = match decoder.decode(&record.bytes) {
            Ok(event) => event,
            Err(e) => {
                stats.decode_failures += 1;
                warn!(
                    file = %source.display(),
                    offset = record.offset,
                    payload = %record.lossy(),
                    error = %e,
                    "could not decode record, skipping"
                );
                continue;
            }
        };

        if event.has_drift() {
            stats.drifted += 1;
            warn!(
                file = %source.display(),
                offset = record.offset,
                event_id = event.id.as_deref().unwrap_or(""),
                unmapped = event.unmapped.as_deref().unwrap_or(""),
                "event has members outside the known schema"
            );
        }

        sink.write_row(&flatten(&event))
            .map_err(|e| PipelineError::Write {
                path: source.to_path_buf(),
                source: e,
            })?;
        stats.rows_written += 1;
    }
    Ok(())
}

/// Convert `input` into a CSV file at `output`.
///
/// The output is only created once the input has been opened. It is always
/// flushed and synced before returning, even when reading failed midway.
pub fn convert_file(
    input: &Path,
    output: &Path,
    decoder: &dyn RecordDecoder,
    stats: &mut FileStats,
) -> Result<(), PipelineError> {
    let file = File::open(input).map_err(|source| PipelineError::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let mut sink = CsvSink::create(output).map_err(|source| PipelineError::Create {
        path: output.to_path_buf(),
        source,
    })?;

    let converted = convert(BufReader::new(file), &mut sink, decoder, input, stats);
    let closed = sink.close().map_err(|source: SinkError| PipelineError::Write {
        path: output.to_path_buf(),
        source,
    });

    debug!(
        file = %input.display(),
        records = stats.records,
        rows = stats.rows_written,
        failures = stats.decode_failures,
        "file converted"
    );
    settle(converted, closed, output)
}

/// The conversion error wins; a close failure behind it is still logged.
fn settle(
    converted: Result<(), PipelineError>,
    closed: Result<(), PipelineError>,
    output: &Path,
) -> Result<(), PipelineError> {
    match (converted, closed) {
        (Err(first), Err(close)) => {
            error!(file = %output.display(), error = %close, "could not flush output after an early stop");
            Err(first)
        }
        (converted, closed) => converted.and(closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::XmlEventDecoder;
    use std::io::Cursor;

    fn run(input: &[u8]) -> (FileStats, Vec<String>) {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        let mut stats = FileStats::default();
        convert(
            Cursor::new(input.to_vec()),
            &mut sink,
            &XmlEventDecoder::new(),
            Path::new("test.log"),
            &mut stats,
        )
        .unwrap();
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        (stats, out.lines().map(str::to_string).collect())
    }

    #[test]
    fn bad_record_between_good_ones_is_skipped() {
        let (stats, lines) = run(b"<event id=\"1\"/>\0<event id=\"2\"><oops></event>\0<event id=\"3\"/>\0");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("3,"));
        assert_eq!(
            stats,
            FileStats {
                records: 3,
                rows_written: 2,
                decode_failures: 1,
                drifted: 0,
            }
        );
    }

    #[test]
    fn drift_is_counted_but_row_kept() {
        let (stats, lines) = run(b"<event id=\"1\"><brand-new/></event>\0");
        assert_eq!(stats.drifted, 1);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("<brand-new/>"));
    }

    #[test]
    fn read_error_takes_precedence_over_close_error() {
        let output = Path::new("out.log.csv");
        let read = || PipelineError::Read {
            path: "in.log".into(),
            source: crate::error::StreamError::Io {
                offset: 4,
                source: std::io::Error::new(std::io::ErrorKind::Other, "bad sector"),
            },
        };
        let write = || PipelineError::Write {
            path: output.to_path_buf(),
            source: SinkError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
        };

        assert!(matches!(
            settle(Err(read()), Err(write()), output),
            Err(PipelineError::Read { .. })
        ));
        assert!(matches!(
            settle(Ok(()), Err(write()), output),
            Err(PipelineError::Write { .. })
        ));
        assert!(matches!(
            settle(Err(read()), Ok(()), output),
            Err(PipelineError::Read { .. })
        ));
        assert!(settle(Ok(()), Ok(()), output).is_ok());
    }

    #[test]
    fn leading_newlines_between_records_are_tolerated() {
        let (stats, lines) = run(b"<event id=\"1\"/>\0\n<event id=\"2\"/>\0\n");
        assert_eq!(stats.rows_written, 2);
        assert!(lines[2].starts_with("2,"));
    }
}
