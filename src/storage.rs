//! Storage abstraction layer for Rungs.
//!
//! The ladder index is a set of small named records (`index`, `5/orphan`,
//! `5/3/transform`, ...). Record names are virtual `/`-separated paths; each
//! backend decides how to lay them out. File and memory backends can be
//! swapped without touching the writer or the query side.
//!
//! # Example
//!
//! ```
//! use rungs::storage::{StorageConfig, StorageFactory};
//! use rungs::storage::memory::MemoryStorageConfig;
//! use std::io::{Read, Write};
//!
//! # fn main() -> rungs::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
//!
//! let mut output = storage.create_output("5/orphan")?;
//! output.write_all(b"zebra\n")?;
//! output.close()?;
//!
//! let mut input = storage.open_input("5/orphan")?;
//! let mut buffer = String::new();
//! input.read_to_string(&mut buffer)?;
//! assert_eq!(buffer, "zebra\n");
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::error::Result;

pub mod file;
pub mod memory;

/// Separator used inside record names.
pub const PATH_DELIM: char = '/';

/// A trait for storage backends that can store and retrieve records.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a record for reading.
    ///
    /// The record must exist, or this will return an error.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create a record for writing, truncating any previous contents.
    ///
    /// Missing intermediate path segments are created as needed.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check if a record exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a record. Deleting a missing record succeeds.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// List all record names, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Get the size of a record in bytes.
    fn file_size(&self, name: &str) -> Result<u64>;

    /// Sync all pending writes to storage.
    fn sync(&self) -> Result<()>;

    /// Read a whole record into memory.
    fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        let mut input = self.open_input(name)?;
        let mut buffer = Vec::with_capacity(input.size()? as usize);
        input.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// A trait for reading data from storage.
pub trait StorageInput: Read + Seek + Send + std::fmt::Debug {
    /// Get the size of the input stream.
    fn size(&self) -> Result<u64>;

    /// Close the input stream.
    fn close(&mut self) -> Result<()>;
}

/// A trait for writing data to storage.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    /// Flush and sync the output to storage.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Get the number of bytes written so far.
    fn position(&self) -> Result<u64>;

    /// Close the output stream. The record is visible to readers afterwards.
    fn close(&mut self) -> Result<()>;
}

// Implement StorageOutput for Box<dyn StorageOutput> to allow trait objects
impl StorageOutput for Box<dyn StorageOutput> {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.as_mut().flush_and_sync()
    }

    fn position(&self) -> Result<u64> {
        self.as_ref().position()
    }

    fn close(&mut self) -> Result<()> {
        self.as_mut().close()
    }
}

// Implement StorageInput for Box<dyn StorageInput> to allow trait objects
impl StorageInput for Box<dyn StorageInput> {
    fn size(&self) -> Result<u64> {
        self.as_ref().size()
    }

    fn close(&mut self) -> Result<()> {
        self.as_mut().close()
    }
}

/// Configuration for storage backends.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Directory-backed storage.
    File(file::FileStorageConfig),

    /// In-memory storage.
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// Helper for constructing concrete storage instances.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend from its configuration.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(mem_config) => {
                let storage = memory::MemoryStorage::new(mem_config);
                Ok(Arc::new(storage))
            }
            StorageConfig::File(file_config) => {
                let path = file_config.path.clone();
                let storage = file::FileStorage::new(&path, file_config)?;
                Ok(Arc::new(storage))
            }
        }
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// File not found.
    FileNotFound(String),

    /// The record name cannot be mapped onto the backend.
    InvalidName(String),

    /// I/O error.
    IoError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::FileNotFound(name) => write!(f, "File not found: {name}"),
            StorageError::InvalidName(name) => write!(f, "Invalid record name: {name}"),
            StorageError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Reject names that are empty, absolute, or escape the storage root.
pub(crate) fn check_name(name: &str) -> std::result::Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with(PATH_DELIM)
        && name
            .split(PATH_DELIM)
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}
