//! Input model for trace-derived rendering frames
//!
//! The trace parser is an external collaborator. This module defines the seam
//! it plugs into: a [`RenderFrame`] trait exposing the three accessors the
//! filmstrip pipeline needs, plus the [`TraceAnalysis`] bundle the host hands
//! over after the visual-progress analysis completes. [`CapturedFrame`] is a
//! ready-made frame type for parsers that decode rasters eagerly, and for
//! fixtures loaded with `serde_json`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::raster::Raster;

/// The time window over which visual progress is measured
///
/// Both fields are in milliseconds. `beginning` is the trace instant where
/// loading started; `complete` is the duration from `beginning` until the
/// page was visually complete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualTimeline {
    pub beginning: f64,
    pub complete: f64,
}

/// One rendered state of the page during load
///
/// Implemented by the trace parser. Frames are assumed time-ordered with
/// monotonically non-decreasing timestamps; raster decoding may be lazy or
/// cached behind the implementation.
pub trait RenderFrame {
    /// Capture time in milliseconds, on the same clock as the timeline.
    fn timestamp(&self) -> f64;

    /// True if this frame was synthesized between real captures rather than
    /// directly observed. Interpolated frames never appear in a filmstrip.
    fn is_interpolated(&self) -> bool;

    /// Decode this frame's RGBA raster.
    fn raster(&self) -> Result<Raster>;
}

/// Result of the visual-progress trace analysis
///
/// This is the speedline-equivalent bundle the host awaits once and then
/// hands to [`compute_filmstrip`](crate::compute_filmstrip).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceAnalysis<F> {
    pub timeline: VisualTimeline,
    pub frames: Vec<F>,
}

/// An eagerly decoded frame
///
/// The simplest [`RenderFrame`] implementation: timestamp, interpolation
/// flag, and an already decoded raster. Deserializable so trace fixtures can
/// be loaded straight from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedFrame {
    timestamp: f64,
    interpolated: bool,
    raster: Raster,
}

impl CapturedFrame {
    pub fn new(timestamp: f64, interpolated: bool, raster: Raster) -> Self {
        Self {
            timestamp,
            interpolated,
            raster,
        }
    }
}

impl RenderFrame for CapturedFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn is_interpolated(&self) -> bool {
        self.interpolated
    }

    fn raster(&self) -> Result<Raster> {
        Ok(self.raster.clone())
    }
}
