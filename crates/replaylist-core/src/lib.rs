//! Replaylist Core Library
//!
//! This crate provides a persisted, most-recently-used playlist of
//! previously opened media items:
//! - Entry lookup and move-to-front upserts keyed by media source
//! - Whole-file JSON persistence of the playlist and its attributes
//! - PNG thumbnail generation and cleanup for playlist entries

pub mod config;
pub mod error;
pub mod fs;
pub mod media;
pub mod playlist;
pub mod thumbnail;

pub use config::{StoreConfig, default_store_directory};
pub use error::{Error, FileSystemError, Result, ThumbnailError};
pub use fs::{FileSystem, RealFileSystem};
pub use media::MediaInfo;
pub use playlist::{PlaylistEntry, PlaylistStore, UNKNOWN_DURATION_SECS};
pub use thumbnail::{PngThumbnailGenerator, ThumbnailGenerator};
