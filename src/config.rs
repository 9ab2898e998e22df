//! Configuration for the preprocessing stage.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RungsError};

/// Configuration for building a ladder index from a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Whether to analyze length partitions concurrently.
    ///
    /// Partitions are independent, so the output is identical either way.
    pub parallel: bool,

    /// Thread pool size for parallel processing.
    /// If None, rayon's global pool is used.
    pub thread_pool_size: Option<usize>,

    /// Words shorter than this are dropped from the dictionary.
    pub min_word_length: Option<usize>,

    /// Words longer than this are dropped from the dictionary.
    pub max_word_length: Option<usize>,

    /// Log and skip lines that are not lowercase words instead of failing.
    pub skip_invalid: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            thread_pool_size: None,
            min_word_length: None,
            max_word_length: None,
            skip_invalid: true,
        }
    }
}

impl PreprocessConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable concurrent processing of length partitions.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Use a dedicated thread pool of the given size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Only keep words of at least `len` characters.
    pub fn with_min_word_length(mut self, len: usize) -> Self {
        self.min_word_length = Some(len);
        self
    }

    /// Only keep words of at most `len` characters.
    pub fn with_max_word_length(mut self, len: usize) -> Self {
        self.max_word_length = Some(len);
        self
    }

    /// Set whether invalid dictionary lines are skipped or rejected.
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Whether a word of length `len` passes the length filters.
    pub fn accepts_length(&self, len: usize) -> bool {
        self.min_word_length.is_none_or(|min| len >= min)
            && self.max_word_length.is_none_or(|max| len <= max)
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_word_length, self.max_word_length)
            && min > max
        {
            return Err(RungsError::invalid_config(format!(
                "min_word_length ({min}) exceeds max_word_length ({max})"
            )));
        }
        if self.thread_pool_size == Some(0) {
            return Err(RungsError::invalid_config(
                "thread_pool_size must be at least 1",
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PreprocessConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PreprocessConfig::default();
        assert!(config.parallel);
        assert!(config.skip_invalid);
        assert!(config.thread_pool_size.is_none());
        assert!(config.accepts_length(1));
        assert!(config.accepts_length(40));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_length_filters() {
        let config = PreprocessConfig::new()
            .with_min_word_length(3)
            .with_max_word_length(5);
        assert!(!config.accepts_length(2));
        assert!(config.accepts_length(3));
        assert!(config.accepts_length(5));
        assert!(!config.accepts_length(6));

        let config = PreprocessConfig::new()
            .with_min_word_length(6)
            .with_max_word_length(5);
        assert!(config.validate().is_err());

        let config = PreprocessConfig::new().with_thread_pool_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"parallel": false, "max_word_length": 8}}"#).unwrap();

        let config = PreprocessConfig::load_from_file(file.path()).unwrap();
        assert!(!config.parallel);
        assert_eq!(config.max_word_length, Some(8));
        assert!(config.skip_invalid);
    }
}
