//! Frame selection over the visual-progress window
//!
//! Targets are spaced evenly across the visual-completeness window rather
//! than the wall-clock trace duration, so each thumbnail lands on a
//! perceptually meaningful progress milestone. Interpolated frames are
//! excluded up front: they're synthetic in-between states, not anything the
//! user actually saw.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::trace::{RenderFrame, VisualTimeline};

/// One sampled instant paired with the frame chosen to represent it
///
/// `frame_index` is the position of the chosen frame in the input slice; it
/// doubles as the cache key the renderer uses to deduplicate encode work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedFrame {
    pub target_timestamp: f64,
    pub frame_index: usize,
}

/// Pick one frame per evenly spaced sample instant.
///
/// Targets sit at fractions `k / count` of the visual-completeness window
/// for `k` in `0..count`, so the first target is the timeline beginning
/// itself. Each non-final slot takes the latest non-interpolated frame at or
/// before its target; the final slot unconditionally takes the last
/// non-interpolated frame so the filmstrip always ends on the final observed
/// state, whatever its timestamp.
///
/// Fails with [`Error::InputUnavailable`] if the trace has no
/// non-interpolated frames at all, or if a non-final target predates every
/// one of them.
pub fn select_frames<F: RenderFrame>(
    frames: &[F],
    timeline: &VisualTimeline,
    count: usize,
) -> Result<Vec<SelectedFrame>> {
    let analyzed: Vec<usize> = frames
        .iter()
        .enumerate()
        .filter(|(_, frame)| !frame.is_interpolated())
        .map(|(index, _)| index)
        .collect();

    let last = *analyzed.last().ok_or_else(|| {
        Error::InputUnavailable("trace contains no non-interpolated frames".into())
    })?;

    if timeline.complete <= 0.0 {
        warn!(
            "degenerate visual timeline (complete = {}ms); all sample instants collapse to the beginning",
            timeline.complete
        );
    }

    let mut selection = Vec::with_capacity(count);
    for slot in 0..count {
        let target = timeline.beginning + timeline.complete * slot as f64 / count as f64;

        let frame_index = if slot + 1 == count {
            // The filmstrip always ends on the final observed state.
            last
        } else {
            // Right-most analyzed frame with timestamp <= target. The
            // analyzed list is time-ordered, so partition_point finds it in
            // O(log n).
            let at_or_before =
                analyzed.partition_point(|&index| frames[index].timestamp() <= target);
            match at_or_before.checked_sub(1) {
                Some(position) => analyzed[position],
                None => {
                    return Err(Error::InputUnavailable(format!(
                        "no frame at or before {:.3}ms (slot {})",
                        target, slot
                    )))
                }
            }
        };

        debug!(
            "slot {}: target {:.3}ms -> frame {} at {:.3}ms",
            slot,
            target,
            frame_index,
            frames[frame_index].timestamp()
        );
        selection.push(SelectedFrame {
            target_timestamp: target,
            frame_index,
        });
    }

    Ok(selection)
}
