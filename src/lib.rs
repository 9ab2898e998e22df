//! # Rungs
//!
//! Shortest word ladders over a preprocessed dictionary.
//!
//! A word ladder connects two words of equal length through dictionary words
//! that each differ from the previous one in exactly one position. Rungs splits
//! the work in two:
//!
//! - **Preprocessing** (run once): partition the dictionary by length, find
//!   one-substitution adjacency with wildcard keys, split each length into
//!   connected components, and serialize one small record pair per component.
//! - **Querying** (run often): validate the two words, resolve their
//!   components, load that single component, and run a breadth-first search.
//!
//! ```
//! use std::sync::Arc;
//!
//! use rungs::dictionary::Dictionary;
//! use rungs::index::IndexReader;
//! use rungs::ladder::QueryRouter;
//! use rungs::preprocess::Preprocessor;
//! use rungs::storage::Storage;
//! use rungs::storage::memory::MemoryStorage;
//!
//! # fn main() -> rungs::error::Result<()> {
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
//! let dictionary = Dictionary::from_words(["cat", "cot", "cog", "dog", "dot"])?;
//! Preprocessor::default().build_into_storage(dictionary, storage.as_ref())?;
//!
//! let router = QueryRouter::new(IndexReader::open(storage)?);
//! let ladder = router.query("cat", "dog")?;
//! assert_eq!(ladder.len(), 4);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod graph;
pub mod index;
pub mod ladder;
pub mod preprocess;
pub mod storage;

pub mod prelude {
    pub use crate::config::PreprocessConfig;
    pub use crate::dictionary::Dictionary;
    pub use crate::error::{QueryError, Result, RungsError};
    pub use crate::index::IndexReader;
    pub use crate::ladder::{Ladder, QueryRouter};
    pub use crate::preprocess::Preprocessor;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
