//! Error types for playlist store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in playlist store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was missing or unusable.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the rejected argument.
        name: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// Store configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File system operation failed.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// Thumbnail generation failed.
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an `InvalidArgument` error for the named argument.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors raised by file system operations, with path context.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// Reading a file failed.
    #[error("Failed to read {}: {reason}", path.display())]
    ReadFailed {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// Writing a file failed.
    #[error("Failed to write {}: {reason}", path.display())]
    WriteFailed {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// Creating a directory failed.
    #[error("Failed to create directory {}: {reason}", path.display())]
    CreateDirFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// Deleting a file failed.
    #[error("Failed to delete {}: {reason}", path.display())]
    DeleteFailed {
        /// Path that could not be deleted.
        path: PathBuf,
        /// Underlying error message.
        reason: String,
    },

    /// A path that was expected to exist does not.
    #[error("Not found: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
}

/// Errors raised while generating thumbnail images.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Encoding the resized image failed.
    #[error("Failed to encode thumbnail: {reason}")]
    EncodeFailed {
        /// Error message from the image encoder.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid_argument("media_source", "must not be blank");
        assert_eq!(
            err.to_string(),
            "Invalid argument `media_source`: must not be blank"
        );
    }

    #[test]
    fn test_configuration_display() {
        let err = Error::Configuration("playlist path has no file name".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: playlist path has no file name"
        );
    }

    #[test]
    fn test_file_system_error_display() {
        let err = Error::FileSystem(FileSystemError::ReadFailed {
            path: PathBuf::from("/test/playlist.json"),
            reason: "permission denied".to_string(),
        });
        assert!(err.to_string().contains("/test/playlist.json"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_thumbnail_error_display() {
        let err = Error::Thumbnail(ThumbnailError::EncodeFailed {
            reason: "unsupported color type".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to encode thumbnail: unsupported color type"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json")
            .err()
            .map(Error::from);
        assert!(matches!(json_err, Some(Error::Serialization(_))));
    }

    #[test]
    fn test_file_system_error_conversion() {
        let fs_err = FileSystemError::NotFound {
            path: PathBuf::from("/missing"),
        };
        let err: Error = fs_err.into();
        assert!(matches!(err, Error::FileSystem(_)));
    }
}
