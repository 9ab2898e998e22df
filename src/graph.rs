//! Word graph analysis for one length partition.
//!
//! # Architecture
//!
//! - **connection**: wildcard keys and connection groups (one-substitution hyperedges)
//! - **component**: flood fill of the groups into connected components and orphans
//!
//! [`LengthGraph`] ties both steps together for a single sorted partition.

use log::debug;

pub mod component;
pub mod connection;

pub use component::{Component, ComponentPartition, ComponentPartitioner};
pub use connection::{ConnectionGroupBuilder, ConnectionGroups, WildcardKey};

/// Everything the index needs to know about one word length.
#[derive(Debug, Clone)]
pub struct LengthGraph {
    length: usize,
    words: Vec<String>,
    groups: ConnectionGroups,
    partition: ComponentPartition,
}

impl LengthGraph {
    /// Analyze a sorted partition of words that all have `length` characters.
    pub fn analyze(length: usize, words: Vec<String>) -> Self {
        let groups = ConnectionGroups::build(&words);
        let partition = ComponentPartitioner::new().partition(&groups);

        debug!(
            "Length {length}: {} words, {} groups, {} components, {} orphans",
            words.len(),
            groups.len(),
            partition.components().len(),
            partition.orphans().len()
        );

        LengthGraph {
            length,
            words,
            groups,
            partition,
        }
    }

    /// The word length of this partition.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Sorted words; a word's position is its id.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Connection groups over word ids.
    pub fn groups(&self) -> &ConnectionGroups {
        &self.groups
    }

    /// Components and orphans.
    pub fn partition(&self) -> &ComponentPartition {
        &self.partition
    }
}
