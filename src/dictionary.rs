//! Dictionary ingestion and partitioning by word length.
//!
//! Ladders never cross word lengths, so every later stage works on one length
//! partition at a time. Each partition is sorted so that word ids (positions
//! in the partition) are reproducible from run to run.

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use log::{debug, warn};

use crate::config::PreprocessConfig;
use crate::error::{Result, RungsError};

/// Check that a word is non-empty and made only of `a..=z`.
pub fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase())
}

/// A dictionary split into sorted, duplicate-free length partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    partitions: BTreeMap<usize, Vec<String>>,
}

impl Dictionary {
    /// Build a dictionary from words using the default configuration.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_words_with_config(words, &PreprocessConfig::default())
    }

    /// Build a dictionary from words, applying the configured filters.
    pub fn from_words_with_config<I, S>(words: I, config: &PreprocessConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();

        for word in words {
            let word = word.as_ref();
            if !is_valid_word(word) {
                if config.skip_invalid {
                    warn!("Skipping invalid dictionary word: {word:?}");
                    continue;
                }
                return Err(RungsError::dictionary(format!(
                    "invalid dictionary word: {word:?}"
                )));
            }
            if !config.accepts_length(word.len()) {
                continue;
            }
            buckets.entry(word.len()).or_default().insert(word.to_string());
        }

        let partitions: BTreeMap<usize, Vec<String>> = buckets
            .into_iter()
            .map(|(len, words)| (len, words.into_iter().collect()))
            .collect();

        for (len, words) in &partitions {
            debug!("Length {len}: {} words", words.len());
        }

        Ok(Dictionary { partitions })
    }

    /// Read one word per line until a blank line or end of input.
    pub fn read_from<R: BufRead>(reader: R, config: &PreprocessConfig) -> Result<Self> {
        let mut words = Vec::new();
        for line in reader.split(b'\n') {
            let line = line?;
            let word = line.strip_suffix(b"\r").unwrap_or(&line);
            if word.is_empty() {
                break;
            }
            // Undecodable bytes become U+FFFD, which the word check rejects.
            words.push(String::from_utf8_lossy(word).into_owned());
        }
        Self::from_words_with_config(words, config)
    }

    /// Word lengths present in the dictionary, ascending.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.partitions.keys().copied()
    }

    /// The sorted words of one length.
    pub fn partition(&self, len: usize) -> Option<&[String]> {
        self.partitions.get(&len).map(Vec::as_slice)
    }

    /// Total number of distinct words.
    pub fn word_count(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    /// Whether the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Consume the dictionary, yielding `(length, sorted words)` ascending by length.
    pub fn into_partitions(self) -> Vec<(usize, Vec<String>)> {
        self.partitions.into_iter().collect()
    }
}
