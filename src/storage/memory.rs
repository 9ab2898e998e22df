//! In-memory storage implementation for testing and in-process pipelines.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::{Storage, StorageError, StorageInput, StorageOutput, check_name};

type FileMap = Arc<Mutex<HashMap<String, Arc<[u8]>>>>;

/// Configuration for [`MemoryStorage`].
#[derive(Debug, Clone)]
pub struct MemoryStorageConfig {
    /// Initial capacity of the record table.
    pub initial_capacity: usize,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        MemoryStorageConfig {
            initial_capacity: 16,
        }
    }
}

/// An in-memory storage implementation.
///
/// Finalized records are kept as `Arc<[u8]>` so opening one for reading does
/// not copy it.
#[derive(Debug)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create a new memory storage.
    pub fn new(config: MemoryStorageConfig) -> Self {
        MemoryStorage {
            files: Arc::new(Mutex::new(HashMap::with_capacity(config.initial_capacity))),
        }
    }

    /// Create a new memory storage with default configuration.
    pub fn new_default() -> Self {
        Self::new(MemoryStorageConfig::default())
    }

    /// Get the number of records stored.
    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Get the total size of all records.
    pub fn total_size(&self) -> u64 {
        self.files.lock().values().map(|data| data.len() as u64).sum()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(Box::new(MemoryInput::new(Arc::clone(data))))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        check_name(name)?;
        Ok(Box::new(MemoryOutput::new(
            name.to_string(),
            Arc::clone(&self.files),
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files.lock().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut file_names: Vec<String> = self.files.lock().keys().cloned().collect();
        file_names.sort();
        Ok(file_names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

/// A memory-based input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Arc<[u8]>>,
    size: u64,
}

impl MemoryInput {
    fn new(data: Arc<[u8]>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A memory-based output implementation.
///
/// The record becomes visible when the output is closed or dropped.
#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    closed: bool,
}

impl MemoryOutput {
    fn new(name: String, files: FileMap) -> Self {
        MemoryOutput {
            name,
            buffer: Vec::new(),
            files,
            closed: false,
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.closed {
            return Err(std::io::Error::other("Output is closed"));
        }

        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.buffer.len() as u64)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            let data: Arc<[u8]> = std::mem::take(&mut self.buffer).into();
            self.files.lock().insert(self.name.clone(), data);
            self.closed = true;
        }
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new_default();

        let mut output = storage.create_output("4/index").unwrap();
        output.write_all(b"cold 0\ncord 0\n").unwrap();
        assert_eq!(output.position().unwrap(), 14);

        // Not visible until closed
        assert!(!storage.file_exists("4/index"));
        output.close().unwrap();
        assert!(storage.file_exists("4/index"));

        let mut input = storage.open_input("4/index").unwrap();
        let mut buffer = String::new();
        input.read_to_string(&mut buffer).unwrap();
        assert_eq!(buffer, "cold 0\ncord 0\n");
        assert_eq!(input.size().unwrap(), 14);

        assert_eq!(storage.file_count(), 1);
        assert_eq!(storage.total_size(), 14);
    }

    #[test]
    fn test_memory_output_dropped() {
        let storage = MemoryStorage::new_default();
        {
            let mut output = storage.create_output("index").unwrap();
            output.write_all(b"4\n").unwrap();
        }
        assert_eq!(storage.file_size("index").unwrap(), 2);
    }

    #[test]
    fn test_memory_storage_listing() {
        let storage = MemoryStorage::new_default();
        for name in ["5/orphan", "index", "5/index"] {
            storage.create_output(name).unwrap().close().unwrap();
        }

        assert_eq!(
            storage.list_files().unwrap(),
            vec!["5/index", "5/orphan", "index"]
        );

        storage.delete_file("index").unwrap();
        assert!(!storage.file_exists("index"));
        assert!(storage.open_input("index").is_err());
        assert!(storage.create_output("a//b").is_err());
    }
}
