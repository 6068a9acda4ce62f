//! The playlist store: a persisted, most-recently-used list of previously
//! opened media items.
//!
//! One [`PlaylistStore`] owns one playlist file and one thumbnails
//! directory. Entries are keyed by media source (case-insensitive) and kept
//! in most-recently-opened order; every operation runs under a single
//! store-wide lock, so a store can be shared between threads as
//! `Arc<PlaylistStore>`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::media::MediaInfo;
use crate::thumbnail::{PngThumbnailGenerator, ThumbnailGenerator};

/// Duration recorded when a media item's duration is unknown.
pub const UNKNOWN_DURATION_SECS: i64 = -1;

/// Store name written when a fresh playlist file is created.
pub const DEFAULT_STORE_NAME: &str = "Replaylist";

/// File extension (lowercase, without the dot) whose sources never receive
/// a generated thumbnail.
pub const NO_THUMBNAIL_EXTENSION: &str = "svp";

/// Store attribute holding the project URL, written on first creation.
const PROJECT_URL_ATTRIBUTE: &str = "x-projecturl";

/// Store attribute holding the library version, refreshed on every open.
const VERSION_ATTRIBUTE: &str = "x-version";

/// Project URL recorded in freshly created stores.
const PROJECT_URL: &str = "https://github.com/replaylist/replaylist";

/// Prefix under which media metadata is stored in entry attributes.
const META_ATTRIBUTE_PREFIX: &str = "meta-";

/// One record for a previously opened media item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Unique identifier of the media item (URI or path); compared
    /// case-insensitively (ASCII).
    pub media_source: String,
    /// Display name.
    pub title: String,
    /// Duration in whole seconds; [`UNKNOWN_DURATION_SECS`] when unknown.
    #[serde(default = "unknown_duration")]
    pub duration_secs: i64,
    /// Unix epoch seconds (UTC) when the item was last opened.
    #[serde(default)]
    pub last_opened_utc: i64,
    /// Container or codec format label.
    #[serde(default)]
    pub format: String,
    /// Thumbnail file name inside the thumbnails directory, if one exists.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Free-form attributes; media metadata lives under `meta-` keys.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

const fn unknown_duration() -> i64 {
    UNKNOWN_DURATION_SECS
}

impl PlaylistEntry {
    /// Build a bare entry; the upsert fills in the remaining fields.
    fn new(media_source: &str, title: String) -> Self {
        Self {
            media_source: media_source.to_string(),
            title,
            duration_secs: UNKNOWN_DURATION_SECS,
            last_opened_utc: 0,
            format: String::new(),
            thumbnail: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Whether the recorded duration is known.
    #[must_use]
    pub const fn has_known_duration(&self) -> bool {
        self.duration_secs >= 0
    }

    /// The recorded duration, or `None` for the unknown sentinel.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        u64::try_from(self.duration_secs).ok().map(Duration::from_secs)
    }
}

/// Full store state as persisted: name, attributes, ordered entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct StoreState {
    #[serde(default)]
    name: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    entries: Vec<PlaylistEntry>,
}

impl StoreState {
    fn position_of(&self, media_source: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.media_source.eq_ignore_ascii_case(media_source))
    }
}

/// A persisted, most-recently-used playlist of previously opened media.
pub struct PlaylistStore {
    config: StoreConfig,
    fs: Arc<dyn FileSystem>,
    thumbnailer: Arc<dyn ThumbnailGenerator>,
    state: Mutex<StoreState>,
}

impl PlaylistStore {
    /// Open the store at the configured location, creating and persisting a
    /// fresh one if no playlist file exists yet.
    ///
    /// A fresh store gets [`DEFAULT_STORE_NAME`] and an `x-projecturl`
    /// attribute and is written to disk immediately. In both cases the
    /// `x-version` attribute is then set (in memory) to this crate's
    /// version.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable, the storage
    /// directories cannot be created, or the playlist file cannot be
    /// read, parsed, or written.
    pub fn open_or_create(config: StoreConfig) -> Result<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem::new());
        let thumbnailer = Arc::new(PngThumbnailGenerator::new(Arc::clone(&fs)));
        Self::open_or_create_with(config, fs, thumbnailer)
    }

    /// Same as [`open_or_create`](Self::open_or_create), with explicit
    /// file system and thumbnail generator collaborators.
    ///
    /// # Errors
    ///
    /// See [`open_or_create`](Self::open_or_create).
    pub fn open_or_create_with(
        config: StoreConfig,
        fs: Arc<dyn FileSystem>,
        thumbnailer: Arc<dyn ThumbnailGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        config.ensure_directories(fs.as_ref())?;

        let store = Self {
            config,
            fs,
            thumbnailer,
            state: Mutex::new(StoreState::default()),
        };

        if store.fs.exists(&store.config.playlist_path) {
            store.load()?;
            info!(
                "Loaded playlist store from {}",
                store.config.playlist_path.display()
            );
        } else {
            {
                let mut state = store.lock_state();
                state.name = DEFAULT_STORE_NAME.to_string();
                state
                    .attributes
                    .insert(PROJECT_URL_ATTRIBUTE.to_string(), PROJECT_URL.to_string());
            }
            store.save()?;
            info!(
                "Created new playlist store at {}",
                store.config.playlist_path.display()
            );
        }

        store.set_attribute(VERSION_ATTRIBUTE, env!("CARGO_PKG_VERSION"));
        Ok(store)
    }

    /// Look up an entry by media source (case-insensitive).
    ///
    /// Returns a snapshot of the first match, or `None`. No side effects.
    #[must_use]
    pub fn find(&self, media_source: &str) -> Option<PlaylistEntry> {
        let state = self.lock_state();
        state
            .position_of(media_source)
            .map(|index| state.entries[index].clone())
    }

    /// Record that a media item was opened, creating or updating its entry
    /// and moving it to the front of the list.
    ///
    /// A new entry's title is taken from the source's file name, from a
    /// `"title"` metadata value (first case-insensitive key match wins), or
    /// from a generated placeholder. An existing entry keeps its title.
    /// Duration, last-opened timestamp, format, and `meta-` attributes are
    /// refreshed unconditionally from `info`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `media_source` is blank.
    pub fn upsert(&self, media_source: &str, info: &MediaInfo) -> Result<()> {
        if media_source.trim().is_empty() {
            return Err(Error::invalid_argument("media_source", "must not be blank"));
        }

        let mut state = self.lock_state();
        let mut entry = match state.position_of(media_source) {
            Some(index) => state.entries.remove(index),
            None => PlaylistEntry::new(media_source, derive_title(media_source, info)),
        };

        entry.duration_secs = info.duration.map_or(UNKNOWN_DURATION_SECS, |d| {
            i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
        });
        entry.last_opened_utc = Utc::now().timestamp();
        entry.format = info.format.clone();
        for (key, value) in &info.metadata {
            let attribute = format!("{META_ATTRIBUTE_PREFIX}{}", sanitize_metadata_key(key));
            entry.attributes.insert(attribute, value.clone());
        }

        debug!("Upserted playlist entry for {}", media_source);
        state.entries.insert(0, entry);
        Ok(())
    }

    /// Attach a freshly generated thumbnail to the entry for
    /// `media_source`.
    ///
    /// The entry's previous thumbnail file is deleted first (if it exists
    /// on disk). Sources with the [`NO_THUMBNAIL_EXTENSION`] extension then
    /// keep their thumbnail cleared; for everything else a new file is
    /// generated and recorded. An unknown `media_source` is a no-op, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `image` has no pixels, and
    /// propagates deletion and generation failures.
    pub fn attach_thumbnail(&self, media_source: &str, image: &DynamicImage) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::invalid_argument(
                "image",
                "must have at least one pixel",
            ));
        }

        let mut state = self.lock_state();
        let Some(index) = state.position_of(media_source) else {
            debug!("No playlist entry for {}, skipping thumbnail", media_source);
            return Ok(());
        };

        // Drop the previous thumbnail file before generating a replacement.
        // A failed delete leaves the field pointing at the old file.
        if let Some(old) = state.entries[index].thumbnail.as_deref() {
            let old_path = self.config.thumbnails_dir.join(old);
            if self.fs.exists(&old_path) {
                self.fs.remove_file(&old_path)?;
            }
        }
        state.entries[index].thumbnail = None;

        if source_extension(media_source).as_deref() == Some(NO_THUMBNAIL_EXTENSION) {
            debug!(
                "Thumbnail generation skipped for .{} source {}",
                NO_THUMBNAIL_EXTENSION, media_source
            );
            return Ok(());
        }

        let file_name = self
            .thumbnailer
            .generate(image, &self.config.thumbnails_dir)?;
        debug!("Attached thumbnail {} to {}", file_name, media_source);
        state.entries[index].thumbnail = Some(file_name);
        Ok(())
    }

    /// Remove the entry for `media_source`, if present.
    ///
    /// Removing an unknown source is a no-op. The entry's thumbnail file,
    /// if any, stays on disk; see
    /// [`sweep_orphan_thumbnails`](Self::sweep_orphan_thumbnails).
    pub fn remove(&self, media_source: &str) {
        let mut state = self.lock_state();
        if let Some(index) = state.position_of(media_source) {
            let entry = state.entries.remove(index);
            debug!("Removed playlist entry for {}", entry.media_source);
        }
    }

    /// Replace the in-memory state with the contents of the playlist file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<()> {
        let mut state = self.lock_state();
        let content = self.fs.read_to_string(&self.config.playlist_path)?;
        *state = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} playlist entries from {}",
            state.entries.len(),
            self.config.playlist_path.display()
        );
        Ok(())
    }

    /// Persist the full in-memory state to the playlist file.
    ///
    /// The write replaces the whole file; there is no incremental or
    /// atomic-swap behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let state = self.lock_state();
        let content = serde_json::to_string_pretty(&*state)?;
        self.fs.write(&self.config.playlist_path, &content)?;
        debug!(
            "Saved {} playlist entries to {}",
            state.entries.len(),
            self.config.playlist_path.display()
        );
        Ok(())
    }

    /// Delete thumbnail files that no current entry references.
    ///
    /// [`remove`](Self::remove) never deletes thumbnail files, so removed
    /// entries leave their previews behind; this reclaims them. Individual
    /// deletion failures are logged at warn and skipped. Returns the file
    /// names that were removed. A missing thumbnails directory yields an
    /// empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the thumbnails directory cannot be listed.
    pub fn sweep_orphan_thumbnails(&self) -> Result<Vec<String>> {
        let state = self.lock_state();

        if !self.fs.exists(&self.config.thumbnails_dir) {
            return Ok(Vec::new());
        }

        let referenced: HashSet<&str> = state
            .entries
            .iter()
            .filter_map(|e| e.thumbnail.as_deref())
            .collect();

        let mut removed = Vec::new();
        for path in self.fs.read_dir(&self.config.thumbnails_dir)? {
            if !self.fs.is_file(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if referenced.contains(name) {
                continue;
            }
            match self.fs.remove_file(&path) {
                Ok(()) => removed.push(name.to_string()),
                Err(e) => warn!("Failed to delete orphan thumbnail {}: {}", path.display(), e),
            }
        }

        if !removed.is_empty() {
            info!("Swept {} orphan thumbnail(s)", removed.len());
        }
        Ok(removed)
    }

    /// Store display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.lock_state().name.clone()
    }

    /// Look up a store-level attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.lock_state().attributes.get(key).cloned()
    }

    /// Set a store-level attribute in memory; call
    /// [`save`](Self::save) to persist it.
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock_state().attributes.insert(key.into(), value.into());
    }

    /// Snapshot of all entries, most recently opened first.
    #[must_use]
    pub fn entries(&self) -> Vec<PlaylistEntry> {
        self.lock_state().entries.clone()
    }

    /// Number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().entries.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().entries.is_empty()
    }

    /// Path of the persisted playlist file.
    #[must_use]
    pub fn playlist_path(&self) -> &Path {
        &self.config.playlist_path
    }

    /// Directory where thumbnail files are written.
    #[must_use]
    pub fn thumbnails_dir(&self) -> &Path {
        &self.config.thumbnails_dir
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("playlist store mutex poisoned")
    }
}

/// Title for a brand-new entry, before any metadata override.
fn derive_title(media_source: &str, info: &MediaInfo) -> String {
    let mut title = default_title(media_source);

    for (key, value) in &info.metadata {
        if key.trim().eq_ignore_ascii_case("title") {
            if !value.trim().is_empty() {
                title = value.clone();
            }
            break;
        }
    }

    if title.trim().is_empty() {
        title = format!("(No Name) - {media_source}");
    }
    title
}

/// File-name-derived default title for local sources, or a timestamped
/// placeholder for everything else.
fn default_title(media_source: &str) -> String {
    if is_local_source(media_source) {
        source_file_stem(media_source)
    } else {
        format!("Media File {}", Utc::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Whether a source names a local file: a `file:` URI, a UNC path, or a
/// plain path with no URI scheme.
fn is_local_source(source: &str) -> bool {
    if source.len() >= 5 && source[..5].eq_ignore_ascii_case("file:") {
        return true;
    }
    if source.starts_with("\\\\") {
        return true;
    }
    !source.contains("://")
}

/// Final path segment of the source, without its extension.
fn source_file_stem(source: &str) -> String {
    let tail = source.rsplit(['/', '\\']).next().unwrap_or_default();
    match tail.rsplit_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => tail.to_string(),
    }
}

/// Lowercased extension of the source's final path segment, if any.
fn source_extension(source: &str) -> Option<String> {
    let tail = source.rsplit(['/', '\\']).next().unwrap_or_default();
    tail.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Trim the key and replace every whitespace character with `-`.
fn sanitize_metadata_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}
