//! Serialized ladder index.
//!
//! The index is a set of line-oriented text records, addressed by virtual
//! paths:
//!
//! | record          | contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | `index`         | every word length present, one per line, ascending       |
//! | `L/index`       | `word component` for every non-orphan word of length `L` |
//! | `L/orphan`      | every orphan word of length `L`                          |
//! | `L/C/index`     | members of component `C`; line position is the local id  |
//! | `L/C/transform` | one connection group per line, space-separated local ids |
//! | `manifest.json` | format version, per-length summary, record checksums     |
//!
//! A component's two records are enough to answer any query inside it, so the
//! query side never loads more than one component.
//!
//! Records are produced through a [`RecordSink`]: either straight into a
//! [`Storage`] ([`StorageSink`]) or as one combined stream ([`stream::StreamSink`])
//! that [`stream::distribute`] later splits back into records.

use std::io::Write;

use crate::error::Result;
use crate::storage::{PATH_DELIM, Storage};

pub mod manifest;
pub mod reader;
pub mod stream;
pub mod verify;
pub mod writer;

pub use manifest::{FORMAT_VERSION, LengthSummary, Manifest, RecordChecksum};
pub use reader::{IndexReader, LoadedComponent, Placement};
pub use stream::{StreamSink, distribute};
pub use verify::{VerifyReport, verify};
pub use writer::IndexWriter;

/// Name of the top-level lengths record.
pub const LENGTHS_RECORD: &str = "index";

/// Name of the manifest record.
pub const MANIFEST_RECORD: &str = "manifest.json";

const INDEX_NAME: &str = "index";
const ORPHAN_NAME: &str = "orphan";
const TRANSFORM_NAME: &str = "transform";

/// Name of the word-to-component record of one length.
pub fn length_index_record(length: usize) -> String {
    format!("{length}{PATH_DELIM}{INDEX_NAME}")
}

/// Name of the orphan record of one length.
pub fn orphan_record(length: usize) -> String {
    format!("{length}{PATH_DELIM}{ORPHAN_NAME}")
}

/// Name of the member record of one component.
pub fn members_record(length: usize, component: usize) -> String {
    format!("{length}{PATH_DELIM}{component}{PATH_DELIM}{INDEX_NAME}")
}

/// Name of the transform (connection group) record of one component.
pub fn transform_record(length: usize, component: usize) -> String {
    format!("{length}{PATH_DELIM}{component}{PATH_DELIM}{TRANSFORM_NAME}")
}

/// Destination for serialized records.
pub trait RecordSink {
    /// Write one complete record.
    fn write_record(&mut self, name: &str, body: &[u8]) -> Result<()>;

    /// Flush anything still buffered.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes each record into a [`Storage`] backend.
#[derive(Debug)]
pub struct StorageSink<'a> {
    storage: &'a dyn Storage,
}

impl<'a> StorageSink<'a> {
    /// Create a sink writing into `storage`.
    pub fn new(storage: &'a dyn Storage) -> Self {
        StorageSink { storage }
    }
}

impl RecordSink for StorageSink<'_> {
    fn write_record(&mut self, name: &str, body: &[u8]) -> Result<()> {
        let mut output = self.storage.create_output(name)?;
        output.write_all(body)?;
        output.close()
    }

    fn finish(&mut self) -> Result<()> {
        self.storage.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_record_names() {
        assert_eq!(length_index_record(5), "5/index");
        assert_eq!(orphan_record(5), "5/orphan");
        assert_eq!(members_record(5, 12), "5/12/index");
        assert_eq!(transform_record(5, 12), "5/12/transform");
    }

    #[test]
    fn test_storage_sink() {
        let storage = MemoryStorage::new_default();
        let mut sink = StorageSink::new(&storage);
        sink.write_record("3/orphan", b"zzz\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(storage.read_all("3/orphan").unwrap(), b"zzz\n");
    }
}
