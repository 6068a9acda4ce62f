//! File system abstraction for testability.
//!
//! This module provides a `FileSystem` trait covering the handful of
//! operations the playlist store performs, allowing tests to run against an
//! in-memory double instead of the real disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use replaylist_core::fs::{FileSystem, RealFileSystem};
//!
//! fn read_playlist<F: FileSystem>(fs: &F, path: &Path) -> Result<String> {
//!     fs.read_to_string(path)
//! }
//!
//! // In production:
//! let fs = RealFileSystem;
//! let json = read_playlist(&fs, Path::new("playlist.json"))?;
//!
//! // In tests:
//! let mock = MockFileSystem::new();
//! mock.add_file("playlist.json", r#"{"name": "Replaylist"}"#);
//! let json = read_playlist(&mock, Path::new("playlist.json"))?;
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, FileSystemError, Result};

/// Converts an I/O error for read operations.
fn read_error(path: &Path, e: io::Error) -> Error {
    Error::FileSystem(FileSystemError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Converts an I/O error for write operations.
fn write_error(path: &Path, e: io::Error) -> Error {
    Error::FileSystem(FileSystemError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Converts an I/O error for directory creation.
fn create_dir_error(path: &Path, e: io::Error) -> Error {
    Error::FileSystem(FileSystemError::CreateDirFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Converts an I/O error for delete operations.
fn delete_error(path: &Path, e: io::Error) -> Error {
    Error::FileSystem(FileSystemError::DeleteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Abstraction over the file system operations the playlist store uses.
///
/// The store reads and writes the playlist file, deletes and lists
/// thumbnail files, and creates its storage directories through this trait.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string contents to a file, creating parent directories and the
    /// file itself if they don't exist.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Write bytes to a file, creating parent directories and the file
    /// itself if they don't exist.
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// List direct entries of a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Real file system implementation using std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| read_error(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| create_dir_error(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| write_error(path, e))
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| create_dir_error(parent, e))?;
        }
        fs::write(path, contents).map_err(|e| write_error(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| create_dir_error(path, e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| delete_error(path, e))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|e| read_error(path, e))?;

        let paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        Ok(paths)
    }
}
