//! One-substitution adjacency via wildcard keys.
//!
//! Blanking out position `i` of a word yields a [`WildcardKey`]; all words of
//! one length that produce the same key differ exactly at `i`. Bucketing every
//! `(word, position)` pair by key therefore finds all one-substitution
//! neighbours in O(N·L) without comparing words pairwise. Each bucket with at
//! least two members is a connection group: a hyperedge whose members are all
//! one hop from each other.

use std::fmt;

use ahash::AHashMap;

/// A word with one position blanked out, as `(prefix, suffix)`.
///
/// Within a single length partition the position is implied by the prefix
/// length, so structural equality on the two halves is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WildcardKey<'a> {
    prefix: &'a [u8],
    suffix: &'a [u8],
}

impl<'a> WildcardKey<'a> {
    /// Key of `word` with `position` blanked out.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not less than the word length.
    pub fn new(word: &'a str, position: usize) -> Self {
        let bytes = word.as_bytes();
        WildcardKey {
            prefix: &bytes[..position],
            suffix: &bytes[position + 1..],
        }
    }

    /// The blanked-out position.
    pub fn position(&self) -> usize {
        self.prefix.len()
    }
}

impl fmt::Display for WildcardKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}",
            String::from_utf8_lossy(self.prefix),
            String::from_utf8_lossy(self.suffix)
        )
    }
}

/// Connection groups of one length partition, plus each word's memberships.
///
/// Group ids and member order follow construction order: groups are numbered
/// by the first appearance of their key (word order, then position order), and
/// members are listed in word order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionGroups {
    groups: Vec<Vec<usize>>,
    memberships: Vec<Vec<usize>>,
}

impl ConnectionGroups {
    /// Build the groups of a partition of equal-length words.
    pub fn build(words: &[String]) -> Self {
        ConnectionGroupBuilder::new(words).build()
    }

    /// Assemble groups from explicit member lists (e.g. read back from storage).
    ///
    /// `word_count` is the number of words the member ids refer to.
    pub fn from_groups(word_count: usize, groups: Vec<Vec<usize>>) -> Self {
        let mut memberships = vec![Vec::new(); word_count];
        for (group_id, members) in groups.iter().enumerate() {
            for &word in members {
                memberships[word].push(group_id);
            }
        }
        ConnectionGroups {
            groups,
            memberships,
        }
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of words the memberships cover.
    pub fn word_count(&self) -> usize {
        self.memberships.len()
    }

    /// Members of one group, as word ids.
    pub fn group(&self, group_id: usize) -> &[usize] {
        &self.groups[group_id]
    }

    /// All groups in construction order.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Ids of the groups a word belongs to.
    pub fn memberships(&self, word_id: usize) -> &[usize] {
        &self.memberships[word_id]
    }

    /// A word with no group has no neighbour at all.
    pub fn is_orphan(&self, word_id: usize) -> bool {
        self.memberships[word_id].is_empty()
    }
}

/// Buckets `(word, position)` pairs by wildcard key.
#[derive(Debug)]
pub struct ConnectionGroupBuilder<'a> {
    words: &'a [String],
    slots: AHashMap<WildcardKey<'a>, usize>,
    buckets: Vec<Vec<usize>>,
}

impl<'a> ConnectionGroupBuilder<'a> {
    /// Create a builder over one length partition.
    pub fn new(words: &'a [String]) -> Self {
        let pairs = words.first().map_or(0, |w| w.len()) * words.len();
        ConnectionGroupBuilder {
            words,
            slots: AHashMap::with_capacity(pairs),
            buckets: Vec::new(),
        }
    }

    fn insert(&mut self, key: WildcardKey<'a>, word_id: usize) {
        let next = self.buckets.len();
        let slot = *self.slots.entry(key).or_insert(next);
        if slot == next {
            self.buckets.push(Vec::new());
        }
        self.buckets[slot].push(word_id);
    }

    /// Bucket every key and keep buckets with two or more members.
    pub fn build(mut self) -> ConnectionGroups {
        let words = self.words;
        for (word_id, word) in words.iter().enumerate() {
            debug_assert_eq!(word.len(), words[0].len(), "mixed word lengths");
            for position in 0..word.len() {
                self.insert(WildcardKey::new(word, position), word_id);
            }
        }

        let groups: Vec<Vec<usize>> = self
            .buckets
            .into_iter()
            .filter(|members| members.len() >= 2)
            .collect();

        ConnectionGroups::from_groups(words.len(), groups)
    }
}
