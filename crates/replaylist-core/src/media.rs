//! Media information descriptor supplied by the host application.

use std::time::Duration;

/// Information about an opened media item.
///
/// The playlist store does no media probing of its own; whatever component
/// opened the stream (player, demuxer) fills this in and passes it to
/// [`upsert`](crate::PlaylistStore::upsert). A `None` duration means the
/// duration is unknown; the store persists it as the `-1` second sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    /// Total duration, if known.
    pub duration: Option<Duration>,
    /// Container or codec format label (e.g. `matroska`, `mp3`).
    pub format: String,
    /// Free-form metadata key/value pairs (tag data, stream properties).
    ///
    /// Pairs are applied in order when stored on an entry; a duplicate key
    /// overwrites the value an earlier pair stored.
    pub metadata: Vec<(String, String)>,
}

impl MediaInfo {
    /// Create a descriptor with the given format label, unknown duration,
    /// and no metadata.
    #[must_use]
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            duration: None,
            format: format.into(),
            metadata: Vec::new(),
        }
    }

    /// Set a known duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Append a metadata key/value pair.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}
