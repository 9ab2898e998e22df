//! Index manifest: format version, summary, and record checksums.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RungsError};

/// Version of the record layout written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Size and CRC32 of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChecksum {
    pub size: u64,
    pub crc32: u32,
}

impl RecordChecksum {
    /// Checksum a record body.
    pub fn of(body: &[u8]) -> Self {
        RecordChecksum {
            size: body.len() as u64,
            crc32: crc32fast::hash(body),
        }
    }
}

/// Counts for one word length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub length: usize,
    pub words: usize,
    pub components: usize,
    pub orphans: usize,
    pub groups: usize,
    /// Size of the largest component, 0 when there is none.
    pub largest_component: usize,
}

/// Describes a complete index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub lengths: Vec<LengthSummary>,
    pub records: BTreeMap<String, RecordChecksum>,
}

impl Manifest {
    /// Start an empty manifest for the current format.
    pub fn new() -> Self {
        Manifest {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            lengths: Vec::new(),
            records: BTreeMap::new(),
        }
    }

    /// Total number of dictionary words.
    pub fn word_count(&self) -> usize {
        self.lengths.iter().map(|s| s.words).sum()
    }

    /// Total number of components across all lengths.
    pub fn component_count(&self) -> usize {
        self.lengths.iter().map(|s| s.components).sum()
    }

    /// Summary of one length, if present.
    pub fn length(&self, length: usize) -> Option<&LengthSummary> {
        self.lengths.iter().find(|s| s.length == length)
    }

    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a manifest and check that its format is supported.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let manifest: Manifest = serde_json::from_slice(bytes)?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(RungsError::format(format!(
                "unsupported index format version {} (expected {FORMAT_VERSION})",
                manifest.format_version
            )));
        }
        Ok(manifest)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        let checksum = RecordChecksum::of(b"cat\ncot\n");
        assert_eq!(checksum.size, 8);
        assert_eq!(checksum.crc32, crc32fast::hash(b"cat\ncot\n"));
        assert_ne!(checksum, RecordChecksum::of(b"cat\ncog\n"));
    }

    #[test]
    fn test_manifest_json() {
        let mut manifest = Manifest::new();
        manifest.lengths.push(LengthSummary {
            length: 3,
            words: 5,
            components: 1,
            orphans: 0,
            groups: 5,
            largest_component: 5,
        });
        manifest
            .records
            .insert("index".to_string(), RecordChecksum::of(b"3\n"));

        let json = manifest.to_json().unwrap();
        assert!(!json.contains('\n'));

        let parsed = Manifest::from_json(json.as_bytes()).unwrap();
        assert_eq!(parsed, manifest);
        assert_eq!(parsed.word_count(), 5);
        assert_eq!(parsed.component_count(), 1);
        assert!(parsed.length(3).is_some());
        assert!(parsed.length(4).is_none());
    }

    #[test]
    fn test_unsupported_version() {
        let mut manifest = Manifest::new();
        manifest.format_version = FORMAT_VERSION + 1;
        let json = serde_json::to_string(&manifest).unwrap();

        let err = Manifest::from_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, RungsError::Format(_)));
    }
}
