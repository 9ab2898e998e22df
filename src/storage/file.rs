//! File-based storage implementation.
//!
//! Record names map onto paths below the root directory, one directory level
//! per `/`-separated segment (`5/3/transform` becomes `<root>/5/3/transform`).

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, RungsError};
use crate::storage::{PATH_DELIM, Storage, StorageError, StorageInput, StorageOutput, check_name};

/// Configuration for [`FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Root directory of the storage.
    pub path: PathBuf,

    /// Buffer size for I/O operations.
    pub buffer_size: usize,

    /// Whether to fsync every record when it is closed.
    pub sync_writes: bool,
}

impl FileStorageConfig {
    /// Create a configuration rooted at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileStorageConfig {
            path: path.as_ref().to_path_buf(),
            buffer_size: 65536, // 64KB buffer for better I/O performance
            sync_writes: false,
        }
    }
}

/// A file-based storage implementation.
#[derive(Debug)]
pub struct FileStorage {
    /// The root directory for storage.
    directory: PathBuf,
    /// Storage configuration.
    config: FileStorageConfig,
}

impl FileStorage {
    /// Create a new file storage in the given directory.
    pub fn new<P: AsRef<Path>>(directory: P, config: FileStorageConfig) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            std::fs::create_dir_all(&directory)
                .map_err(|e| RungsError::storage(format!("Failed to create directory: {e}")))?;
        }

        if !directory.is_dir() {
            return Err(RungsError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileStorage { directory, config })
    }

    /// Get the root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Get the full path for a record name.
    fn file_path(&self, name: &str) -> Result<PathBuf> {
        check_name(name)?;
        let mut path = self.directory.clone();
        path.extend(name.split(PATH_DELIM));
        Ok(path)
    }

    fn collect_files(&self, dir: &Path, prefix: &str, files: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir).map_err(|e| StorageError::IoError(e.to_string()))? {
            let entry = entry.map_err(|e| StorageError::IoError(e.to_string()))?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}{PATH_DELIM}{file_name}")
            };

            if path.is_dir() {
                self.collect_files(&path, &name, files)?;
            } else if path.is_file() {
                files.push(name);
            }
        }
        Ok(())
    }
}

fn not_found_or_io(name: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::FileNotFound(name.to_string())
    } else {
        StorageError::IoError(e.to_string())
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let path = self.file_path(name)?;
        let file = File::open(&path).map_err(|e| not_found_or_io(name, e))?;

        Ok(Box::new(FileInput::new(file, self.config.buffer_size)?))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let path = self.file_path(name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Box::new(FileOutput::new(
            file,
            self.config.buffer_size,
            self.config.sync_writes,
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.file_path(name).map(|path| path.is_file()).unwrap_or(false)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        let path = self.file_path(name)?;
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| StorageError::IoError(format!("Failed to delete file: {e}")))?;
        }

        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        self.collect_files(&self.directory, "", &mut files)?;
        files.sort();
        Ok(files)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        let path = self.file_path(name)?;
        let metadata = path.metadata().map_err(|e| not_found_or_io(name, e))?;

        Ok(metadata.len())
    }

    fn sync(&self) -> Result<()> {
        // Individual records are synced when they are closed
        Ok(())
    }
}

/// A file input implementation.
#[derive(Debug)]
pub struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl FileInput {
    fn new(file: File, buffer_size: usize) -> Result<Self> {
        let metadata = file
            .metadata()
            .map_err(|e| RungsError::storage(format!("Failed to get file metadata: {e}")))?;

        let size = metadata.len();
        let reader = BufReader::with_capacity(buffer_size, file);

        Ok(FileInput { reader, size })
    }
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for FileInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }

    fn close(&mut self) -> Result<()> {
        // The file is closed when the BufReader is dropped
        Ok(())
    }
}

/// A file output implementation.
#[derive(Debug)]
pub struct FileOutput {
    writer: BufWriter<File>,
    sync_writes: bool,
    position: u64,
}

impl FileOutput {
    fn new(file: File, buffer_size: usize, sync_writes: bool) -> Self {
        FileOutput {
            writer: BufWriter::with_capacity(buffer_size, file),
            sync_writes,
            position: 0,
        }
    }
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes_written = self.writer.write(buf)?;
        self.position += bytes_written as u64;
        Ok(bytes_written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| RungsError::storage(format!("Failed to flush: {e}")))?;

        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| RungsError::storage(format!("Failed to sync: {e}")))?;

        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.position)
    }

    fn close(&mut self) -> Result<()> {
        if self.sync_writes {
            self.flush_and_sync()
        } else {
            self.writer
                .flush()
                .map_err(|e| RungsError::storage(format!("Failed to flush: {e}")))
        }
    }
}
