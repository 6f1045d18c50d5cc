//! Filmstrip extraction for page-load traces
//!
//! Given the frames captured during a page load and the visual-progress
//! timeline derived from them, this crate produces a fixed-size storyboard
//! of thumbnails showing how the page's rendering evolved: ten sample
//! instants spread evenly across the visual-completeness window, each
//! represented by the latest frame the user had actually seen by then,
//! downscaled to a 100-pixel-tall thumbnail and handed to an external lossy
//! encoder.
//!
//! The trace parser and the codec are collaborators, plugged in through the
//! [`RenderFrame`] and [`ImageEncoder`] traits.
//!
//! # Example
//!
//! ```
//! use filmstrip::{
//!     compute_filmstrip, CapturedFrame, FilmstripConfig, Raster, TraceAnalysis, VisualTimeline,
//! };
//!
//! # fn main() -> filmstrip::Result<()> {
//! let frames = vec![
//!     CapturedFrame::new(0.0, false, Raster::filled(120, 120, [255, 255, 255, 255])),
//!     CapturedFrame::new(500.0, false, Raster::filled(120, 120, [40, 40, 40, 255])),
//! ];
//! let analysis = TraceAnalysis {
//!     timeline: VisualTimeline { beginning: 0.0, complete: 1000.0 },
//!     frames,
//! };
//! // Stand-in for a real JPEG codec.
//! let encoder = |raster: &Raster, _quality: u8| -> filmstrip::Result<Vec<u8>> {
//!     Ok(raster.pixels().to_vec())
//! };
//!
//! let thumbnails = compute_filmstrip(&analysis, &encoder, &FilmstripConfig::default())?;
//! assert_eq!(thumbnails.len(), 10);
//! assert_eq!(thumbnails[0].timing, 0);
//! # Ok(())
//! # }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as Base64Engine;
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod encode;
pub mod raster;
pub mod render;
pub mod select;
pub mod trace;

// Async-friendly entry point (tokio spawn_blocking wrapper)
pub mod async_api;

pub use async_api::compute_filmstrip_async;
pub use encode::ImageEncoder;
pub use raster::Raster;
pub use render::{render_filmstrip, render_filmstrip_parallel, FrameCache};
pub use select::{select_frames, SelectedFrame};
pub use trace::{CapturedFrame, RenderFrame, TraceAnalysis, VisualTimeline};

/// Default number of thumbnails per filmstrip
pub const NUMBER_OF_THUMBNAILS: usize = 10;

/// Default thumbnail height in pixels
pub const THUMBNAIL_HEIGHT: u32 = 100;

/// Default quality passed to the lossy encoder
pub const ENCODE_QUALITY: u8 = 90;

/// Configuration for filmstrip extraction
///
/// The defaults are the production values (10 thumbnails, 100px tall,
/// quality 90); the fields exist mainly so tests can run against smaller
/// fixtures.
///
/// # Examples
///
/// ```
/// let config = filmstrip::FilmstripConfig::default();
/// assert_eq!(config.thumbnail_count, 10);
/// assert_eq!(config.thumbnail_height, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmstripConfig {
    /// Number of sample instants (and thumbnails) per filmstrip
    pub thumbnail_count: usize,
    /// Height every thumbnail is scaled to, in pixels
    pub thumbnail_height: u32,
    /// Quality handed to the lossy encoder (0-100)
    pub quality: u8,
}

impl Default for FilmstripConfig {
    fn default() -> Self {
        Self {
            thumbnail_count: NUMBER_OF_THUMBNAILS,
            thumbnail_height: THUMBNAIL_HEIGHT,
            quality: ENCODE_QUALITY,
        }
    }
}

impl FilmstripConfig {
    fn validate(&self) -> Result<()> {
        if self.thumbnail_count == 0 {
            return Err(Error::ConfigError("thumbnail count must be non-zero".into()));
        }
        if self.thumbnail_height == 0 {
            return Err(Error::ConfigError("thumbnail height must be non-zero".into()));
        }
        if self.quality > 100 {
            return Err(Error::ConfigError(format!(
                "encoder quality must be 0-100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// One entry of a filmstrip
///
/// Immutable once produced. `timing` is the sample instant relative to the
/// timeline beginning, rounded to whole milliseconds; `timestamp` is the
/// absolute instant in microseconds; `data` is whatever the encoder
/// produced. Serialization emits `data` as base64 so a report layer can pass
/// thumbnails straight through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub timing: i64,
    pub timestamp: f64,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Thumbnail {
    /// Encoded bytes as a standard base64 string.
    pub fn data_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as Base64Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Extract a filmstrip from an analyzed trace.
///
/// Runs the frame selector and then the thumbnail renderer; there is no
/// feedback between the two. Returns exactly `config.thumbnail_count`
/// thumbnails in increasing time order, or an error — never a short set.
pub fn compute_filmstrip<F, E>(
    analysis: &TraceAnalysis<F>,
    encoder: &E,
    config: &FilmstripConfig,
) -> Result<Vec<Thumbnail>>
where
    F: RenderFrame,
    E: ImageEncoder,
{
    config.validate()?;
    let selection = select_frames(&analysis.frames, &analysis.timeline, config.thumbnail_count)?;
    render_filmstrip(&analysis.frames, &selection, &analysis.timeline, encoder, config)
}

/// [`compute_filmstrip`] with encode work spread across worker threads.
///
/// Same selection, same output; only the per-frame scale-and-encode work is
/// parallelized.
pub fn compute_filmstrip_parallel<F, E>(
    analysis: &TraceAnalysis<F>,
    encoder: &E,
    config: &FilmstripConfig,
) -> Result<Vec<Thumbnail>>
where
    F: RenderFrame + Sync,
    E: ImageEncoder + Sync,
{
    config.validate()?;
    let selection = select_frames(&analysis.frames, &analysis.timeline, config.thumbnail_count)?;
    render_filmstrip_parallel(&analysis.frames, &selection, &analysis.timeline, encoder, config)
}
