//! Thumbnail rendering and encode deduplication
//!
//! Neighboring sample instants frequently resolve to the same source frame
//! (pages spend long stretches visually idle), so encoded bytes are cached
//! per frame index and reused. The cache lives for one filmstrip invocation
//! and is discarded with it.

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use crate::encode::ImageEncoder;
use crate::error::{Error, Result};
use crate::select::SelectedFrame;
use crate::trace::{RenderFrame, VisualTimeline};
use crate::{FilmstripConfig, Thumbnail};

/// Per-invocation map from frame index to previously encoded bytes
///
/// Keys are positions in the input frame slice, the stable identity handle
/// the selector reports. The map is mutex-guarded so the parallel renderer
/// can share it; uniqueness of encode work is structural (each distinct key
/// is owned by exactly one caller), not enforced by the lock.
pub struct FrameCache {
    entries: Mutex<HashMap<usize, Vec<u8>>>,
}

impl FrameCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Encoded bytes for `key`, if that frame was already rendered.
    pub fn get(&self, key: usize) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(&key).cloned()
    }

    /// Return the cached bytes for `key`, or run `encode` and cache its
    /// result. The closure runs outside the lock; callers must not hand the
    /// same key to two concurrent closures.
    pub fn get_or_encode<E>(&self, key: usize, encode: E) -> Result<Vec<u8>>
    where
        E: FnOnce() -> Result<Vec<u8>>,
    {
        if let Some(hit) = self.get(key) {
            debug!("reusing encoded thumbnail for frame {}", key);
            return Ok(hit);
        }
        let bytes = encode()?;
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.entry(key).or_insert(bytes).clone())
    }
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode, downscale, and encode one source frame.
fn encode_frame<F, E>(frame: &F, encoder: &E, config: &FilmstripConfig) -> Result<Vec<u8>>
where
    F: RenderFrame,
    E: ImageEncoder,
{
    let raster = frame.raster()?;
    let scaled = raster.scale_to_height(config.thumbnail_height)?;
    encoder.encode(&scaled, config.quality)
}

fn assemble(slot: &SelectedFrame, beginning: f64, data: Vec<u8>) -> Thumbnail {
    Thumbnail {
        timing: (slot.target_timestamp - beginning).round() as i64,
        timestamp: slot.target_timestamp * 1000.0,
        data,
    }
}

/// Render every selected frame into a thumbnail, in slot order.
///
/// Sequential; repeated selections of the same frame reuse the cached bytes
/// and never reach the encoder a second time. Any decode or encode failure
/// aborts the whole filmstrip.
pub fn render_filmstrip<F, E>(
    frames: &[F],
    selection: &[SelectedFrame],
    timeline: &VisualTimeline,
    encoder: &E,
    config: &FilmstripConfig,
) -> Result<Vec<Thumbnail>>
where
    F: RenderFrame,
    E: ImageEncoder,
{
    let cache = FrameCache::new();
    selection
        .iter()
        .map(|slot| {
            let data = cache.get_or_encode(slot.frame_index, || {
                encode_frame(&frames[slot.frame_index], encoder, config)
            })?;
            Ok(assemble(slot, timeline.beginning, data))
        })
        .collect()
}

/// Render selected frames with encode work spread across worker threads.
///
/// The distinct frame indices are partitioned across up to `num_cpus`
/// scoped workers sharing one [`FrameCache`]; each distinct frame is still
/// encoded exactly once. Output is identical to [`render_filmstrip`].
pub fn render_filmstrip_parallel<F, E>(
    frames: &[F],
    selection: &[SelectedFrame],
    timeline: &VisualTimeline,
    encoder: &E,
    config: &FilmstripConfig,
) -> Result<Vec<Thumbnail>>
where
    F: RenderFrame + Sync,
    E: ImageEncoder + Sync,
{
    let mut distinct: Vec<usize> = selection.iter().map(|slot| slot.frame_index).collect();
    distinct.sort_unstable();
    distinct.dedup();

    // Not worth spawning for a single distinct frame.
    if distinct.len() <= 1 {
        return render_filmstrip(frames, selection, timeline, encoder, config);
    }

    let workers = num_cpus::get().clamp(1, distinct.len());
    let chunk_size = distinct.len().div_ceil(workers);
    debug!(
        "encoding {} distinct frames across {} workers",
        distinct.len(),
        workers
    );

    let cache = FrameCache::new();
    std::thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers);
        for chunk in distinct.chunks(chunk_size) {
            let cache = &cache;
            handles.push(scope.spawn(move || -> Result<()> {
                for &index in chunk {
                    cache.get_or_encode(index, || {
                        encode_frame(&frames[index], encoder, config)
                    })?;
                }
                Ok(())
            }));
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_| Error::Other("render worker panicked".into()))??;
        }
        Ok(())
    })?;

    // Assemble in slot order from the warm cache.
    selection
        .iter()
        .map(|slot| {
            let data = cache.get(slot.frame_index).ok_or_else(|| {
                Error::Other(format!("frame {} missing from cache", slot.frame_index))
            })?;
            Ok(assemble(slot, timeline.beginning, data))
        })
        .collect()
}
