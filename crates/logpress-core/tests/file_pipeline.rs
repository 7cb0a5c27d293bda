//! File-level conversion tests against real files on disk.

use logpress_core::{
    convert, convert_file, CsvSink, FileStats, PipelineError, XmlEventDecoder, HEADER,
};
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn converts_file_with_one_malformed_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("site_1-events-20140206.log");
    let output = dir.path().join("site_1-events-20140206.log.csv");
    std::fs::write(
        &input,
        b"<event id=\"a\" type=\"page:view\"/>\0<event id=\"b\"\0<event id=\"c\" type=\"page:view\"/>\0",
    )
    .unwrap();

    let mut stats = FileStats::default();
    convert_file(&input, &output, &XmlEventDecoder::new(), &mut stats).unwrap();

    let lines = read_lines(&output);
    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a,,page:view,"));
    assert!(lines[2].starts_with("c,,page:view,"));
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.rows_written, 2);
}

#[test]
fn missing_input_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.log");
    let output = dir.path().join("absent.log.csv");

    let mut stats = FileStats::default();
    let err = convert_file(&input, &output, &XmlEventDecoder::new(), &mut stats).unwrap_err();
    assert!(matches!(err, PipelineError::Open { .. }));
    assert!(!output.exists());
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("x.log");
    let output = dir.path().join("x.log.csv");
    std::fs::write(
        &input,
        "<event id=\"1\"><request><parameters><param name=\"a\">1</param><param name=\"b\">2</param></parameters></request></event>\0"
            .repeat(50),
    )
    .unwrap();

    let decoder = XmlEventDecoder::new();
    convert_file(&input, &output, &decoder, &mut FileStats::default()).unwrap();
    let first = std::fs::read(&output).unwrap();
    convert_file(&input, &output, &decoder, &mut FileStats::default()).unwrap();
    let second = std::fs::read(&output).unwrap();
    assert_eq!(first, second);
    assert!(String::from_utf8(first).unwrap().contains(",a:1;b:2,"));
}

/// Serves `data`, then fails instead of reporting end of input.
struct BrokenDisk {
    data: Cursor<Vec<u8>>,
}

impl Read for BrokenDisk {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::Other, "I/O error")),
            n => Ok(n),
        }
    }
}

#[test]
fn read_error_keeps_rows_already_written() {
    let reader = BufReader::new(BrokenDisk {
        data: Cursor::new(b"<event id=\"1\"/>\0<event id=\"2\"/>\0<event id=".to_vec()),
    });
    let mut sink = CsvSink::new(Vec::new()).unwrap();
    let mut stats = FileStats::default();

    let err = convert(
        reader,
        &mut sink,
        &XmlEventDecoder::new(),
        Path::new("broken.log"),
        &mut stats,
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Read { .. }));

    let out = String::from_utf8(sink.finish().unwrap()).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,"));
    assert!(lines[2].starts_with("2,"));
    assert_eq!(stats.rows_written, 2);
}
