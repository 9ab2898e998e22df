use rungs::config::PreprocessConfig;
use rungs::dictionary::Dictionary;
use rungs::error::{QueryError, RungsError};
use rungs::index::{IndexReader, distribute};
use rungs::ladder::{Ladder, QueryRouter};
use rungs::preprocess::Preprocessor;
use rungs::storage::file::FileStorageConfig;
use rungs::storage::memory::MemoryStorage;
use rungs::storage::{Storage, StorageConfig, StorageFactory};

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::tempdir;

fn reason(result: rungs::error::Result<Ladder>) -> QueryError {
    match result {
        Err(e) => e.as_query().unwrap_or_else(|| panic!("unexpected error: {e}")),
        Ok(ladder) => panic!("expected a failure, got {:?}", ladder.words()),
    }
}

fn memory_router(words: &[&str]) -> QueryRouter {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    Preprocessor::default()
        .build_into_storage(Dictionary::from_words(words).unwrap(), storage.as_ref())
        .unwrap();
    QueryRouter::new(IndexReader::open(storage).unwrap())
}

/// Every component of every length, as word sets.
fn partition_sets(reader: &IndexReader) -> BTreeSet<(usize, BTreeSet<String>)> {
    let mut sets = BTreeSet::new();
    for summary in &reader.manifest().lengths {
        for id in 0..summary.components {
            let component = reader.load_component(summary.length, id).unwrap();
            sets.insert((
                summary.length,
                component.words().iter().cloned().collect::<BTreeSet<_>>(),
            ));
        }
    }
    sets
}

#[test]
fn test_file_storage_end_to_end() {
    let dir = tempdir().unwrap();
    let storage_config = StorageConfig::File(FileStorageConfig::new(dir.path()));
    let storage = StorageFactory::create(storage_config).unwrap();

    let dictionary = Dictionary::read_from(
        Cursor::new("cat\ncot\ncog\ndog\ndot\n\nignored\n"),
        &PreprocessConfig::default(),
    )
    .unwrap();
    assert_eq!(dictionary.word_count(), 5);
    Preprocessor::default()
        .build_into_storage(dictionary, storage.as_ref())
        .unwrap();

    assert!(dir.path().join("index").exists());
    assert!(dir.path().join("3/0/transform").exists());

    let router = QueryRouter::new(IndexReader::open(storage).unwrap());
    let ladder = router.query("cat", "dog").unwrap();
    assert_eq!(ladder.len(), 4);
    assert!(ladder.is_valid_chain());
    assert_eq!(ladder.words()[0], "cat");
    assert_eq!(ladder.words()[3], "dog");
    let middle = [ladder.words()[1].as_str(), ladder.words()[2].as_str()];
    assert!(middle == ["cot", "cog"] || middle == ["cot", "dot"]);

    assert_eq!(reason(router.query("cat", "ignored")), QueryError::LengthMismatch);
}

#[test]
fn test_orphan_pair() {
    let router = memory_router(&["cat", "dog"]);
    assert_eq!(reason(router.query("cat", "dog")), QueryError::NoLadder);
    assert_eq!(router.query("dog", "dog").unwrap().words(), ["dog", "dog"]);
}

#[test]
fn test_input_validation_before_lookup() {
    let router = memory_router(&["cat", "cot"]);
    assert_eq!(reason(router.query("Cat", "dog")), QueryError::InvalidInput);
    assert_eq!(reason(router.query("cat", "dogs")), QueryError::LengthMismatch);
    assert_eq!(reason(router.query("c4t", "cot")), QueryError::InvalidInput);
    assert_eq!(reason(router.query("cats", "cots")), QueryError::NotInDictionary);
}

#[test]
fn test_different_components_never_ladder() {
    let words = [
        "cat", "cot", "cog", "dog", // one component
        "ink", "irk", "ask", "auk", // two more
        "zzz",
    ];
    let router = memory_router(&words);
    for a in ["cat", "cot", "cog", "dog"] {
        for b in ["ink", "irk", "ask", "auk", "zzz"] {
            assert_eq!(reason(router.query(a, b)), QueryError::NoLadder);
            assert_eq!(reason(router.query(b, a)), QueryError::NoLadder);
        }
    }
    assert_eq!(reason(router.query("ink", "ask")), QueryError::NoLadder);
    assert_eq!(router.query("ink", "irk").unwrap().len(), 2);
}

#[test]
fn test_mixed_lengths() {
    let router = memory_router(&["a", "b", "at", "it", "cold", "cord", "card", "ward", "warm"]);
    assert_eq!(router.query("a", "b").unwrap().words(), ["a", "b"]);
    assert_eq!(router.query("at", "it").unwrap().len(), 2);
    let ladder = router.query("cold", "warm").unwrap();
    assert_eq!(ladder.len(), 5);
    assert!(ladder.is_valid_chain());
}

#[test]
fn test_stream_distribute_round_trip() {
    let words = ["cat", "cot", "cog", "dog", "dot", "zzz", "ox", "on", "in"];

    let mut stream = Vec::new();
    let manifest = Preprocessor::default()
        .build_into_stream(Dictionary::from_words(words).unwrap(), &mut stream)
        .unwrap();
    let text = String::from_utf8(stream.clone()).unwrap();
    assert!(text.starts_with("===\nindex\n"));

    let dir = tempdir().unwrap();
    let storage = StorageFactory::create(StorageConfig::File(FileStorageConfig::new(dir.path())))
        .unwrap();
    let records = distribute(Cursor::new(stream), storage.as_ref()).unwrap();
    assert_eq!(records, manifest.records.len() + 1);

    let reader = IndexReader::open(storage).unwrap();
    assert_eq!(reader.manifest().lengths, manifest.lengths);
    assert!(rungs::index::verify(&reader).unwrap().is_ok());

    let router = QueryRouter::new(reader);
    assert_eq!(router.query("ox", "in").unwrap().len(), 3);
    assert_eq!(reason(router.query("cat", "zzz")), QueryError::NoLadder);
}

#[test]
fn test_partition_is_invariant() {
    let words = [
        "cat", "cot", "cog", "dog", "dot", "bat", "bit", "big", "zzz", "ink", "irk", "cold",
        "cord", "card", "ward", "wart", "lamp",
    ];
    let mut reversed = words.to_vec();
    reversed.reverse();

    let first: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    let second: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    Preprocessor::new(PreprocessConfig::new().with_parallel(false))
        .build_into_storage(Dictionary::from_words(words).unwrap(), first.as_ref())
        .unwrap();
    Preprocessor::new(PreprocessConfig::new().with_parallel(true))
        .build_into_storage(Dictionary::from_words(reversed).unwrap(), second.as_ref())
        .unwrap();

    let first = partition_sets(&IndexReader::open(first).unwrap());
    let second = partition_sets(&IndexReader::open(second).unwrap());
    assert_eq!(first, second);
    assert!(first.contains(&(
        3,
        ["bat", "big", "bit", "cat", "cog", "cot", "dog", "dot"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    )));
}

#[test]
fn test_missing_manifest_is_rejected() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    assert!(matches!(
        IndexReader::open(storage),
        Err(RungsError::Storage(_)) | Err(RungsError::Format(_))
    ));
}
