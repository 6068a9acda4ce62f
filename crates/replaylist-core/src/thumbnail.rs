//! Thumbnail generation for playlist entries.
//!
//! Entries reference their thumbnail by file name; the actual image work is
//! behind the [`ThumbnailGenerator`] trait so hosts can plug in their own.
//! The default implementation downscales the frame, encodes it as PNG, and
//! writes `<uuid>.png` into the thumbnails directory.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, ThumbnailError};
use crate::fs::FileSystem;

/// Default longest edge of a generated thumbnail, in pixels.
pub const DEFAULT_MAX_EDGE_PX: u32 = 256;

/// Produces a thumbnail file from an in-memory image.
///
/// Implementations are synchronous and return the name of the created file,
/// relative to `target_dir`.
#[cfg_attr(test, mockall::automock)]
pub trait ThumbnailGenerator: Send + Sync {
    /// Generate a thumbnail for `image` inside `target_dir` and return the
    /// created file name.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing the thumbnail fails.
    fn generate(&self, image: &DynamicImage, target_dir: &Path) -> Result<String>;
}

/// Default generator: bounded-size PNG files named by a fresh UUID.
pub struct PngThumbnailGenerator {
    fs: Arc<dyn FileSystem>,
    max_edge_px: u32,
}

impl PngThumbnailGenerator {
    /// Create a generator that writes through the given file system.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            max_edge_px: DEFAULT_MAX_EDGE_PX,
        }
    }

    /// Override the maximum edge length of generated thumbnails.
    #[must_use]
    pub fn with_max_edge(mut self, max_edge_px: u32) -> Self {
        self.max_edge_px = max_edge_px.max(1);
        self
    }
}

impl ThumbnailGenerator for PngThumbnailGenerator {
    fn generate(&self, image: &DynamicImage, target_dir: &Path) -> Result<String> {
        let (width, height) = fit_to_max_edge(image.width(), image.height(), self.max_edge_px);
        let resized = if width == image.width() && height == image.height() {
            image.clone()
        } else {
            image.resize(width, height, FilterType::Lanczos3)
        };

        let mut encoded = Cursor::new(Vec::new());
        resized
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|e| ThumbnailError::EncodeFailed {
                reason: e.to_string(),
            })?;

        let file_name = format!("{}.png", Uuid::new_v4());
        self.fs
            .write_bytes(&target_dir.join(&file_name), encoded.get_ref())?;

        debug!(
            "Generated thumbnail {} ({}x{})",
            file_name,
            resized.width(),
            resized.height()
        );
        Ok(file_name)
    }
}

/// Scale `(width, height)` down so the longer edge is at most `max_edge`,
/// preserving aspect ratio with round-to-nearest. Dimensions already within
/// bounds are returned unchanged; nothing is ever upscaled.
fn fit_to_max_edge(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }
    let (w, h, m) = (u64::from(width), u64::from(height), u64::from(max_edge));
    if w >= h {
        let scaled = ((h * m + w / 2) / w).max(1);
        (max_edge, scaled as u32)
    } else {
        let scaled = ((w * m + h / 2) / h).max(1);
        (scaled as u32, max_edge)
    }
}
