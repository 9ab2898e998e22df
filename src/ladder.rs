//! Online stage: answer ladder queries against a stored index.
//!
//! - **path_finder**: breadth-first search inside one loaded component
//! - **router**: query validation, component resolution, and dispatch

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod path_finder;
pub mod router;

pub use path_finder::PathFinder;
pub use router::QueryRouter;

/// Value printed in place of a ladder length when a query fails.
pub const FAILURE_SENTINEL: i64 = -1;

/// A sequence of words from source to destination, inclusive.
///
/// `Display` renders the word count followed by one word per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    words: Vec<String>,
}

impl Ladder {
    /// Wrap a word sequence.
    pub fn new(words: Vec<String>) -> Self {
        Ladder { words }
    }

    /// The ladder from a word to itself: the word, twice.
    pub fn to_self(word: &str) -> Self {
        Ladder {
            words: vec![word.to_string(), word.to_string()],
        }
    }

    /// Words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words, endpoints included.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the ladder holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of substitutions along the ladder.
    pub fn hops(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    /// Whether consecutive words share a length and differ at exactly one position.
    ///
    /// The `[w, w]` self-ladder is accepted as a special case.
    pub fn is_valid_chain(&self) -> bool {
        if let [a, b] = self.words.as_slice()
            && a == b
        {
            return true;
        }
        self.words.windows(2).all(|pair| {
            pair[0].len() == pair[1].len()
                && pair[0]
                    .bytes()
                    .zip(pair[1].bytes())
                    .filter(|(x, y)| x != y)
                    .count()
                    == 1
        })
    }

    /// Consume the ladder, yielding its words.
    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.words.len())?;
        for word in &self.words {
            writeln!(f, "{word}")?;
        }
        Ok(())
    }
}
