//! Combined record stream.
//!
//! Every record is framed as a marker line `===`, a line holding the record
//! name, and then the record's lines. [`distribute`] splits such a stream back
//! into individual records; empty lines and anything before the first marker
//! are ignored.

use std::io::{BufRead, Write};

use log::debug;

use crate::error::Result;
use crate::index::RecordSink;
use crate::storage::{Storage, StorageOutput};

/// Line that starts a new record.
pub const SECTION_MARKER: &str = "===";

/// Writes records as one section-delimited stream.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    writer: W,
}

impl<W: Write> StreamSink<W> {
    /// Create a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        StreamSink { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for StreamSink<W> {
    fn write_record(&mut self, name: &str, body: &[u8]) -> Result<()> {
        writeln!(self.writer, "{SECTION_MARKER}")?;
        writeln!(self.writer, "{name}")?;
        self.writer.write_all(body)?;
        if !body.is_empty() && !body.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

enum State {
    Preamble,
    Name,
    Content(Box<dyn StorageOutput>),
}

/// Split a combined stream into records of `storage`. Returns the number of
/// records written.
pub fn distribute<R: BufRead>(reader: R, storage: &dyn Storage) -> Result<usize> {
    let mut state = State::Preamble;
    let mut records = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == SECTION_MARKER {
            if let State::Content(mut output) = std::mem::replace(&mut state, State::Name) {
                output.close()?;
            }
            continue;
        }

        match &mut state {
            State::Preamble => {}
            State::Name => {
                debug!("Distributing record {line}");
                state = State::Content(storage.create_output(line)?);
                records += 1;
            }
            State::Content(output) => {
                output.write_all(line.as_bytes())?;
                output.write_all(b"\n")?;
            }
        }
    }

    if let State::Content(mut output) = state {
        output.close()?;
    }
    storage.sync()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use std::io::Cursor;

    #[test]
    fn test_stream_sink_framing() {
        let mut sink = StreamSink::new(Vec::new());
        sink.write_record("index", b"3\n").unwrap();
        sink.write_record("3/orphan", b"").unwrap();
        sink.write_record("3/0/transform", b"0 1").unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "===\nindex\n3\n===\n3/orphan\n===\n3/0/transform\n0 1\n"
        );
    }

    #[test]
    fn test_distribute() {
        let stream = "preamble ignored\n===\nindex\n3\n\n===\n3/orphan\n===\n3/0/index\ncat\ncot\n";
        let storage = MemoryStorage::new_default();

        let count = distribute(Cursor::new(stream), &storage).unwrap();
        assert_eq!(count, 3);
        assert_eq!(storage.read_all("index").unwrap(), b"3\n");
        assert_eq!(storage.read_all("3/orphan").unwrap(), b"");
        assert_eq!(storage.read_all("3/0/index").unwrap(), b"cat\ncot\n");
        assert!(!storage.file_exists("preamble ignored"));
    }

    #[test]
    fn test_distribute_rejects_bad_name() {
        let storage = MemoryStorage::new_default();
        assert!(distribute(Cursor::new("===\n../x\ndata\n"), &storage).is_err());
    }
}
