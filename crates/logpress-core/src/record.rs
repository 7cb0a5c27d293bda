//! `RecordStream`: forward-only reader yielding NUL-delimited records.

use crate::error::StreamError;
use crate::event::RawRecord;
use std::io::BufRead;
use std::iter::FusedIterator;
use tracing::{debug, warn};

/// The byte that terminates every record.
pub const RECORD_SENTINEL: u8 = 0x00;

/// Lazily splits a reader into records on [`RECORD_SENTINEL`].
///
/// The stream is finite and non-restartable. It ends at end of input, at
/// the first zero-length record, or after yielding a single read error.
pub struct RecordStream<R> {
    reader: R,
    buf: Vec<u8>,
    offset: u64,
    index: u64,
    done: bool,
}

impl<R: BufRead> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(8 * 1024),
            offset: 0,
            index: 0,
            done: false,
        }
    }

    /// Number of bytes consumed so far, sentinels included.
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    fn read_next(&mut self) -> Result<Option<RawRecord>, StreamError> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(RECORD_SENTINEL, &mut self.buf)
            .map_err(|source| StreamError::Io {
                offset: self.offset,
                source,
            })?;

        if n == 0 {
            return Ok(None);
        }

        let start = self.offset;
        self.offset += n as u64;

        if self.buf.last() != Some(&RECORD_SENTINEL) {
            // Input ended mid-record: the tail never got its terminator.
            if !self.buf.iter().all(u8::is_ascii_whitespace) {
                warn!(
                    offset = start,
                    bytes = n,
                    "discarding unterminated trailing record"
                );
            }
            return Ok(None);
        }

        self.buf.pop();
        if self.buf.is_empty() {
            debug!(offset = start, "empty record, treating as end of stream");
            return Ok(None);
        }

        let record = RawRecord {
            index: self.index,
            offset: start,
            bytes: std::mem::take(&mut self.buf),
        };
        self.index += 1;
        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = Result<RawRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordStream<R> {}
