//! Store configuration: where the playlist file and its thumbnails live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// File name of the persisted playlist document.
pub const PLAYLIST_FILE_NAME: &str = "playlist.json";

/// Default directory name for generated thumbnails, beside the playlist file.
pub const THUMBNAILS_DIR_NAME: &str = "thumbnails";

/// Locations used by a playlist store instance.
///
/// One store owns one playlist file plus one thumbnails directory. The
/// default configuration lives under the platform-local data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the persisted playlist file.
    pub playlist_path: PathBuf,
    /// Directory where generated thumbnail files are written.
    pub thumbnails_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::rooted_at(default_store_directory())
    }
}

impl StoreConfig {
    /// Configuration rooted at the given directory:
    /// `<root>/playlist.json` and `<root>/thumbnails`.
    #[must_use]
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            playlist_path: root.join(PLAYLIST_FILE_NAME),
            thumbnails_dir: root.join(THUMBNAILS_DIR_NAME),
        }
    }

    /// Override the playlist file path.
    #[must_use]
    pub fn with_playlist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.playlist_path = path.into();
        self
    }

    /// Override the thumbnails directory.
    #[must_use]
    pub fn with_thumbnails_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.thumbnails_dir = dir.into();
        self
    }

    /// Check that the configuration is usable.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.playlist_path.file_name().is_none() {
            return Err(Error::Configuration(format!(
                "Playlist path has no file name: {}",
                self.playlist_path.display()
            )));
        }
        Ok(())
    }

    /// Create the playlist file's parent directory and the thumbnails
    /// directory if they are missing.
    pub(crate) fn ensure_directories(&self, fs: &dyn FileSystem) -> Result<()> {
        if let Some(parent) = self.playlist_path.parent()
            && !fs.exists(parent)
        {
            fs.create_dir_all(parent)?;
        }
        if !fs.exists(&self.thumbnails_dir) {
            fs.create_dir_all(&self.thumbnails_dir)?;
        }
        debug!(
            "Store directories ready: playlist at {}, thumbnails in {}",
            self.playlist_path.display(),
            self.thumbnails_dir.display()
        );
        Ok(())
    }
}

/// Platform-default directory for store data.
#[must_use]
pub fn default_store_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("replaylist")
}
