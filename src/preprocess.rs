//! Offline stage: analyze a dictionary once and serialize the ladder index.

use std::io::Write;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::config::PreprocessConfig;
use crate::dictionary::Dictionary;
use crate::error::{Result, RungsError};
use crate::graph::LengthGraph;
use crate::index::{IndexWriter, Manifest, RecordSink, StorageSink, StreamSink};
use crate::storage::Storage;

/// Builds ladder indexes from dictionaries.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Create a preprocessor with the given configuration.
    pub fn new(config: PreprocessConfig) -> Self {
        Preprocessor { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Analyze every length partition of the dictionary.
    ///
    /// Partitions share nothing, so with `parallel` enabled they are analyzed
    /// concurrently; results come back in ascending length order either way.
    pub fn analyze(&self, dictionary: Dictionary) -> Result<Vec<LengthGraph>> {
        self.config.validate()?;
        let partitions = dictionary.into_partitions();

        if !self.config.parallel {
            return Ok(partitions
                .into_iter()
                .map(|(length, words)| LengthGraph::analyze(length, words))
                .collect());
        }

        let run = move || -> Vec<LengthGraph> {
            partitions
                .into_par_iter()
                .map(|(length, words)| LengthGraph::analyze(length, words))
                .collect()
        };

        match self.config.thread_pool_size {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| RungsError::invalid_config(format!("thread pool: {e}")))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }

    /// Analyze the dictionary and write every record to `sink`.
    pub fn build<S: RecordSink>(&self, dictionary: Dictionary, sink: S) -> Result<Manifest> {
        let start = Instant::now();
        let graphs = self.analyze(dictionary)?;

        let mut writer = IndexWriter::new(sink);
        let lengths: Vec<usize> = graphs.iter().map(LengthGraph::length).collect();
        writer.write_lengths(&lengths)?;
        for graph in &graphs {
            writer.write_length(graph)?;
        }
        let manifest = writer.finish()?;

        info!(
            "Indexed {} words in {} lengths ({} components) in {:?}",
            manifest.word_count(),
            manifest.lengths.len(),
            manifest.component_count(),
            start.elapsed()
        );
        Ok(manifest)
    }

    /// Build an index straight into a storage backend.
    pub fn build_into_storage(
        &self,
        dictionary: Dictionary,
        storage: &dyn Storage,
    ) -> Result<Manifest> {
        self.build(dictionary, StorageSink::new(storage))
    }

    /// Build an index as one combined, section-delimited stream.
    pub fn build_into_stream<W: Write>(
        &self,
        dictionary: Dictionary,
        writer: W,
    ) -> Result<Manifest> {
        self.build(dictionary, StreamSink::new(writer))
    }
}
