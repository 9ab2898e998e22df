//! Query validation and dispatch.

use log::debug;

use crate::dictionary::is_valid_word;
use crate::error::{QueryError, Result};
use crate::index::{IndexReader, Placement};
use crate::ladder::Ladder;
use crate::ladder::path_finder::PathFinder;

/// Check a query pair without touching stored data.
pub fn validate_query(source: &str, destination: &str) -> std::result::Result<(), QueryError> {
    if !is_valid_word(source) || !is_valid_word(destination) {
        return Err(QueryError::InvalidInput);
    }
    if source.len() != destination.len() {
        return Err(QueryError::LengthMismatch);
    }
    Ok(())
}

/// Answers ladder queries, loading at most one component per query.
#[derive(Debug, Clone)]
pub struct QueryRouter {
    reader: IndexReader,
}

impl QueryRouter {
    /// Route queries against an opened index.
    pub fn new(reader: IndexReader) -> Self {
        QueryRouter { reader }
    }

    /// The index being queried.
    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Find a shortest ladder from `source` to `destination`.
    ///
    /// User-facing failures come back as [`RungsError::Query`](crate::error::RungsError::Query);
    /// anything else is an I/O, format, or internal consistency error.
    pub fn query(&self, source: &str, destination: &str) -> Result<Ladder> {
        validate_query(source, destination)?;

        let length = source.len();
        if !self.reader.has_length(length)? {
            return Err(QueryError::NotInDictionary.into());
        }

        let (from, to) = self.reader.resolve(length, source, destination)?;
        debug!("Resolved {source} -> {from:?}, {destination} -> {to:?}");
        if !from.is_known() || !to.is_known() {
            return Err(QueryError::NotInDictionary.into());
        }

        if source == destination {
            return Ok(Ladder::to_self(source));
        }

        // Orphans never match anything, not even each other.
        match (from, to) {
            (Placement::Component(a), Placement::Component(b)) if a == b => {
                let component = self.reader.load_component(length, a)?;
                PathFinder::new(&component).find(source, destination)
            }
            _ => Err(QueryError::NoLadder.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreprocessConfig;
    use crate::dictionary::Dictionary;
    use crate::error::RungsError;
    use crate::preprocess::Preprocessor;
    use crate::storage::Storage;
    use crate::storage::memory::MemoryStorage;
    use std::sync::Arc;

    fn router(words: &[&str]) -> QueryRouter {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Preprocessor::new(PreprocessConfig::default())
            .build_into_storage(Dictionary::from_words(words).unwrap(), storage.as_ref())
            .unwrap();
        QueryRouter::new(IndexReader::open(storage).unwrap())
    }

    fn reason(result: Result<Ladder>) -> QueryError {
        result.unwrap_err().as_query().expect("expected a query failure")
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("cat", "dog"), Ok(()));
        assert_eq!(validate_query("Cat", "dog"), Err(QueryError::InvalidInput));
        assert_eq!(validate_query("", ""), Err(QueryError::InvalidInput));
        assert_eq!(validate_query("cat", "do g"), Err(QueryError::InvalidInput));
        assert_eq!(validate_query("cat", "dogs"), Err(QueryError::LengthMismatch));
    }

    #[test]
    fn test_found_ladder() {
        let router = router(&["cat", "cot", "cog", "dog", "dot"]);
        let ladder = router.query("cat", "dog").unwrap();
        assert_eq!(ladder.len(), 4);
        assert!(ladder.is_valid_chain());
        assert_eq!(ladder.words().first().unwrap(), "cat");
        assert_eq!(ladder.words().last().unwrap(), "dog");
    }

    #[test]
    fn test_self_ladder() {
        let router = router(&["cat", "cot", "zzz"]);
        assert_eq!(router.query("cat", "cat").unwrap(), Ladder::to_self("cat"));
        assert_eq!(router.query("zzz", "zzz").unwrap(), Ladder::to_self("zzz"));
    }

    #[test]
    fn test_failures() {
        let router = router(&["cat", "cot", "ant", "apt", "zzz", "yyy"]);

        assert_eq!(reason(router.query("Cat", "dog")), QueryError::InvalidInput);
        assert_eq!(reason(router.query("cat", "dogs")), QueryError::LengthMismatch);
        assert_eq!(reason(router.query("cats", "dogs")), QueryError::NotInDictionary);
        assert_eq!(reason(router.query("cat", "qqq")), QueryError::NotInDictionary);
        assert_eq!(reason(router.query("qqq", "qqq")), QueryError::NotInDictionary);
        assert_eq!(reason(router.query("cat", "ant")), QueryError::NoLadder);
        assert_eq!(reason(router.query("cat", "zzz")), QueryError::NoLadder);
        assert_eq!(reason(router.query("zzz", "yyy")), QueryError::NoLadder);
    }

    #[test]
    fn test_orphans_only() {
        let router = router(&["cat", "dog"]);
        assert_eq!(reason(router.query("cat", "dog")), QueryError::NoLadder);
    }

    #[test]
    fn test_inconsistent_index() {
        use std::io::Write;

        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        Preprocessor::default()
            .build_into_storage(
                Dictionary::from_words(["cat", "cot", "dot", "dog"]).unwrap(),
                storage.as_ref(),
            )
            .unwrap();
        let mut output = storage.create_output("3/0/transform").unwrap();
        output.write_all(b"0 1\n").unwrap();
        output.close().unwrap();

        let router = QueryRouter::new(IndexReader::open(storage).unwrap());
        assert!(matches!(
            router.query("cat", "dog"),
            Err(RungsError::Internal(_))
        ));
    }
}
