//! Serializes analyzed length partitions into index records.

use std::fmt::Write as _;

use ahash::AHashMap;
use log::debug;

use crate::error::{Result, RungsError};
use crate::graph::LengthGraph;
use crate::index::manifest::{LengthSummary, Manifest, RecordChecksum};
use crate::index::{
    LENGTHS_RECORD, MANIFEST_RECORD, RecordSink, length_index_record, members_record,
    orphan_record, transform_record,
};

/// Writes the records of a ladder index, in stream order, and keeps the
/// manifest up to date as it goes.
///
/// Call [`write_lengths`](Self::write_lengths) once, then
/// [`write_length`](Self::write_length) for each length in ascending order,
/// then [`finish`](Self::finish).
#[derive(Debug)]
pub struct IndexWriter<S: RecordSink> {
    sink: S,
    manifest: Manifest,
}

impl<S: RecordSink> IndexWriter<S> {
    /// Create a writer on top of a sink.
    pub fn new(sink: S) -> Self {
        IndexWriter {
            sink,
            manifest: Manifest::new(),
        }
    }

    fn emit(&mut self, name: &str, body: String) -> Result<()> {
        let bytes = body.into_bytes();
        if self
            .manifest
            .records
            .insert(name.to_string(), RecordChecksum::of(&bytes))
            .is_some()
        {
            return Err(RungsError::internal(format!("record {name} written twice")));
        }
        self.sink.write_record(name, &bytes)
    }

    /// Write the top-level record of word lengths present.
    pub fn write_lengths(&mut self, lengths: &[usize]) -> Result<()> {
        let mut body = String::new();
        for length in lengths {
            writeln!(body, "{length}").map_err(fmt_error)?;
        }
        self.emit(LENGTHS_RECORD, body)
    }

    /// Write every record of one analyzed length partition.
    pub fn write_length(&mut self, graph: &LengthGraph) -> Result<()> {
        let length = graph.length();
        let words = graph.words();
        let partition = graph.partition();

        let mut index = String::new();
        let mut orphans = String::new();
        for (word_id, word) in words.iter().enumerate() {
            match partition.component_of(word_id) {
                Some(component) => writeln!(index, "{word} {component}"),
                None => writeln!(orphans, "{word}"),
            }
            .map_err(fmt_error)?;
        }
        self.emit(&length_index_record(length), index)?;
        self.emit(&orphan_record(length), orphans)?;

        let mut largest_component = 0;
        for component in partition.components() {
            largest_component = largest_component.max(component.len());

            let mut local_ids = AHashMap::with_capacity(component.len());
            let mut members = String::new();
            for (local_id, &word_id) in component.members().iter().enumerate() {
                local_ids.insert(word_id, local_id);
                writeln!(members, "{}", words[word_id]).map_err(fmt_error)?;
            }

            let mut transform = String::new();
            for &group_id in component.groups() {
                let mut first = true;
                for word_id in graph.groups().group(group_id) {
                    let local_id = local_ids.get(word_id).ok_or_else(|| {
                        RungsError::internal(format!(
                            "group {group_id} leaves component {} of length {length}",
                            component.id()
                        ))
                    })?;
                    if !first {
                        transform.push(' ');
                    }
                    write!(transform, "{local_id}").map_err(fmt_error)?;
                    first = false;
                }
                transform.push('\n');
            }

            self.emit(&members_record(length, component.id()), members)?;
            self.emit(&transform_record(length, component.id()), transform)?;
        }

        debug!(
            "Wrote length {length}: {} components",
            partition.components().len()
        );

        self.manifest.lengths.push(LengthSummary {
            length,
            words: words.len(),
            components: partition.components().len(),
            orphans: partition.orphans().len(),
            groups: graph.groups().len(),
            largest_component,
        });
        Ok(())
    }

    /// Write the manifest and flush the sink.
    pub fn finish(mut self) -> Result<Manifest> {
        let json = self.manifest.to_json()? + "\n";
        self.sink.write_record(MANIFEST_RECORD, json.as_bytes())?;
        self.sink.finish()?;
        Ok(self.manifest)
    }
}

fn fmt_error(e: std::fmt::Error) -> RungsError {
    RungsError::other(format!("formatting failed: {e}"))
}
