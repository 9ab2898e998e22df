//! Reads index records back: length lookup, component resolution, and
//! per-component loading.

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::dictionary::is_valid_word;
use crate::error::{Result, RungsError};
use crate::graph::ConnectionGroups;
use crate::index::manifest::Manifest;
use crate::index::{
    LENGTHS_RECORD, MANIFEST_RECORD, length_index_record, members_record, orphan_record,
    transform_record,
};
use crate::storage::Storage;

/// Where a word sits in the index of its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Member of the given component.
    Component(usize),
    /// Present, but without any one-substitution neighbour.
    Orphan,
    /// Not in the dictionary.
    Missing,
}

impl Placement {
    /// Whether the word is in the dictionary at all.
    pub fn is_known(&self) -> bool {
        !matches!(self, Placement::Missing)
    }
}

fn record_text(storage: &dyn Storage, name: &str) -> Result<String> {
    String::from_utf8(storage.read_all(name)?)
        .map_err(|_| RungsError::format(format!("{name}: not valid UTF-8")))
}

/// One component's adjacency, loaded from its member and transform records.
#[derive(Debug, Clone)]
pub struct LoadedComponent {
    length: usize,
    id: usize,
    words: Vec<String>,
    local_ids: AHashMap<String, usize>,
    groups: ConnectionGroups,
}

impl LoadedComponent {
    /// Load component `id` of `length` from storage, touching only its two records.
    pub fn load(storage: &dyn Storage, length: usize, id: usize) -> Result<Self> {
        let members = record_text(storage, &members_record(length, id))?;
        let transform = record_text(storage, &transform_record(length, id))?;
        Self::from_records(length, id, &members, &transform)
    }

    /// Parse a component from the text of its two records.
    pub fn from_records(length: usize, id: usize, members: &str, transform: &str) -> Result<Self> {
        let context = members_record(length, id);

        let mut words = Vec::new();
        let mut local_ids = AHashMap::new();
        for word in members.lines() {
            if word.len() != length || !is_valid_word(word) {
                return Err(RungsError::format(format!(
                    "{context}: bad member {word:?}"
                )));
            }
            if local_ids.insert(word.to_string(), words.len()).is_some() {
                return Err(RungsError::format(format!(
                    "{context}: duplicate member {word:?}"
                )));
            }
            words.push(word.to_string());
        }

        let mut groups = Vec::new();
        for (line_no, line) in transform.lines().enumerate() {
            let members = line
                .split(' ')
                .map(|field| match field.parse::<usize>() {
                    Ok(local_id) if local_id < words.len() => Ok(local_id),
                    _ => Err(RungsError::format(format!(
                        "{} line {}: bad local id {field:?}",
                        transform_record(length, id),
                        line_no + 1
                    ))),
                })
                .collect::<Result<Vec<usize>>>()?;
            if members.len() < 2 {
                return Err(RungsError::format(format!(
                    "{} line {}: group has fewer than two members",
                    transform_record(length, id),
                    line_no + 1
                )));
            }
            groups.push(members);
        }

        debug!(
            "Loaded component {id} of length {length}: {} words, {} groups",
            words.len(),
            groups.len()
        );

        let groups = ConnectionGroups::from_groups(words.len(), groups);
        Ok(LoadedComponent {
            length,
            id,
            words,
            local_ids,
            groups,
        })
    }

    /// Word length of the component.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Component id within its length.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Members in local-id order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Word with the given local id.
    pub fn word(&self, local_id: usize) -> &str {
        &self.words[local_id]
    }

    /// Local id of a member word.
    pub fn local_id(&self, word: &str) -> Option<usize> {
        self.local_ids.get(word).copied()
    }

    /// Connection groups over local ids.
    pub fn groups(&self) -> &ConnectionGroups {
        &self.groups
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the component has no members (only for malformed input).
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Query-side access to a stored index.
#[derive(Debug, Clone)]
pub struct IndexReader {
    storage: Arc<dyn Storage>,
    manifest: Manifest,
}

impl IndexReader {
    /// Open an index, checking its manifest.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        if !storage.file_exists(MANIFEST_RECORD) {
            return Err(RungsError::format(format!(
                "{MANIFEST_RECORD} is missing; not a ladder index"
            )));
        }
        let manifest = Manifest::from_json(&storage.read_all(MANIFEST_RECORD)?)?;
        Ok(IndexReader { storage, manifest })
    }

    /// The index manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// All word lengths listed in the top-level record.
    pub fn lengths(&self) -> Result<Vec<usize>> {
        record_text(self.storage.as_ref(), LENGTHS_RECORD)?
            .lines()
            .map(|line| {
                line.parse::<usize>().map_err(|_| {
                    RungsError::format(format!("{LENGTHS_RECORD}: bad length {line:?}"))
                })
            })
            .collect()
    }

    /// Whether any dictionary word has `length` characters.
    pub fn has_length(&self, length: usize) -> Result<bool> {
        let wanted = length.to_string();
        Ok(record_text(self.storage.as_ref(), LENGTHS_RECORD)?
            .lines()
            .any(|line| line == wanted))
    }

    /// Place two words of length `length` with one scan of the length's index
    /// record, falling back to the orphan record for words not found there.
    pub fn resolve(
        &self,
        length: usize,
        first: &str,
        second: &str,
    ) -> Result<(Placement, Placement)> {
        let index_name = length_index_record(length);
        let mut placements = [Placement::Missing, Placement::Missing];
        let targets = [first, second];

        for line in record_text(self.storage.as_ref(), &index_name)?.lines() {
            let (word, component) = line
                .split_once(' ')
                .ok_or_else(|| RungsError::format(format!("{index_name}: bad line {line:?}")))?;
            for (placement, target) in placements.iter_mut().zip(targets) {
                if word == target {
                    let component = component.parse::<usize>().map_err(|_| {
                        RungsError::format(format!("{index_name}: bad component in {line:?}"))
                    })?;
                    *placement = Placement::Component(component);
                }
            }
        }

        if placements.contains(&Placement::Missing) {
            for word in record_text(self.storage.as_ref(), &orphan_record(length))?.lines() {
                for (placement, target) in placements.iter_mut().zip(targets) {
                    if *placement == Placement::Missing && word == target {
                        *placement = Placement::Orphan;
                    }
                }
            }
        }

        Ok((placements[0], placements[1]))
    }

    /// Load one component.
    pub fn load_component(&self, length: usize, id: usize) -> Result<LoadedComponent> {
        LoadedComponent::load(self.storage.as_ref(), length, id)
    }
}
