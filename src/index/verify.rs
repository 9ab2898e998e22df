//! Integrity checks for a stored index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RungsError};
use crate::graph::ComponentPartitioner;
use crate::index::manifest::RecordChecksum;
use crate::index::reader::{IndexReader, LoadedComponent};
use crate::index::{length_index_record, orphan_record};
use crate::storage::Storage;

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyReport {
    pub records_checked: usize,
    pub components_checked: usize,
    pub problems: Vec<String>,
}

impl VerifyReport {
    /// Whether no problem was found.
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

fn differs_by_one(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count() == 1
}

/// Check record checksums and the structure of every component.
///
/// Data problems are collected in the report; only failures to read the
/// manifest itself are returned as errors.
pub fn verify(reader: &IndexReader) -> Result<VerifyReport> {
    let storage = reader.storage().as_ref();
    let manifest = reader.manifest();
    let mut report = VerifyReport::default();

    for (name, expected) in &manifest.records {
        report.records_checked += 1;
        match storage.read_all(name) {
            Ok(body) => {
                let actual = RecordChecksum::of(&body);
                if actual != *expected {
                    report.problems.push(format!("{name}: checksum mismatch"));
                }
            }
            Err(e) => report.problems.push(format!("{name}: {e}")),
        }
    }

    for summary in &manifest.lengths {
        let length = summary.length;
        let assigned = match component_assignments(storage, length) {
            Ok(assigned) => assigned,
            Err(e) => {
                report.problems.push(e.to_string());
                continue;
            }
        };

        for id in 0..summary.components {
            report.components_checked += 1;
            match LoadedComponent::load(storage, length, id) {
                Ok(component) => check_component(&component, &assigned, &mut report.problems),
                Err(e) => report.problems.push(e.to_string()),
            }
        }

        let orphan_name = orphan_record(length);
        match storage.read_all(&orphan_name) {
            Ok(body) => {
                let orphans = body.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();
                if orphans != summary.orphans {
                    report.problems.push(format!(
                        "{orphan_name}: {orphans} orphans, manifest says {}",
                        summary.orphans
                    ));
                }
            }
            Err(e) => report.problems.push(format!("{orphan_name}: {e}")),
        }
    }

    Ok(report)
}

fn component_assignments(storage: &dyn Storage, length: usize) -> Result<BTreeMap<String, usize>> {
    let name = length_index_record(length);
    let text = String::from_utf8_lossy(&storage.read_all(&name)?).into_owned();
    let mut assigned = BTreeMap::new();
    for line in text.lines() {
        let parsed = line
            .split_once(' ')
            .and_then(|(word, id)| id.parse::<usize>().ok().map(|id| (word, id)));
        match parsed {
            Some((word, id)) => {
                assigned.insert(word.to_string(), id);
            }
            None => {
                return Err(RungsError::format(format!("{name}: bad line {line:?}")));
            }
        }
    }
    Ok(assigned)
}

fn check_component(
    component: &LoadedComponent,
    assigned: &BTreeMap<String, usize>,
    problems: &mut Vec<String>,
) {
    let label = format!("component {} of length {}", component.id(), component.length());

    for (group_id, group) in component.groups().groups().iter().enumerate() {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                if !differs_by_one(component.word(a), component.word(b)) {
                    problems.push(format!(
                        "{label}: group {group_id} joins {} and {}",
                        component.word(a),
                        component.word(b)
                    ));
                }
            }
        }
    }

    let partition = ComponentPartitioner::new().partition(component.groups());
    if partition.components().len() != 1 || !partition.orphans().is_empty() {
        problems.push(format!(
            "{label}: not connected ({} parts, {} isolated words)",
            partition.components().len(),
            partition.orphans().len()
        ));
    }

    for word in component.words() {
        if assigned.get(word) != Some(&component.id()) {
            problems.push(format!("{label}: {word} is not assigned to it"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreprocessConfig;
    use crate::dictionary::Dictionary;
    use crate::preprocess::Preprocessor;
    use crate::storage::memory::MemoryStorage;
    use std::io::Write;
    use std::sync::Arc;

    fn build(words: &[&str]) -> (Arc<dyn Storage>, IndexReader) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Preprocessor::new(PreprocessConfig::default())
            .build_into_storage(Dictionary::from_words(words).unwrap(), storage.as_ref())
            .unwrap();
        let reader = IndexReader::open(Arc::clone(&storage)).unwrap();
        (storage, reader)
    }

    #[test]
    fn test_clean_index() {
        let (_storage, reader) = build(&["cat", "cog", "cot", "dog", "dot", "zzz", "ox", "ax"]);
        let report = verify(&reader).unwrap();
        assert!(report.is_ok(), "{:?}", report.problems);
        assert_eq!(report.components_checked, 2);
        assert_eq!(report.records_checked, reader.manifest().records.len());
    }

    #[test]
    fn test_detects_tampering() {
        let (storage, reader) = build(&["cat", "cot", "dog", "dot"]);

        let mut output = storage.create_output("3/0/transform").unwrap();
        output.write_all(b"0 1 2 3\n").unwrap();
        output.close().unwrap();

        let report = verify(&reader).unwrap();
        assert!(!report.is_ok());
        assert!(report.problems.iter().any(|p| p.contains("checksum mismatch")));
        assert!(report.problems.iter().any(|p| p.contains("joins")));
    }

    #[test]
    fn test_detects_disconnected_component() {
        let (storage, reader) = build(&["cat", "cot", "dog", "dot"]);

        // Drop the group that links the two halves.
        let mut output = storage.create_output("3/0/transform").unwrap();
        output.write_all(b"0 1\n").unwrap();
        output.close().unwrap();

        let report = verify(&reader).unwrap();
        assert!(report.problems.iter().any(|p| p.contains("not connected")));
    }
}
