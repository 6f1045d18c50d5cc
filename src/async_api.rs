//! Async-friendly entry point
//!
//! Trace analysis is usually awaited from an async host; the filmstrip
//! itself is CPU-bound pixel and codec work, so it runs on tokio's blocking
//! pool rather than on the reactor.

use crate::encode::ImageEncoder;
use crate::error::{Error, Result};
use crate::trace::{RenderFrame, TraceAnalysis};
use crate::{compute_filmstrip, FilmstripConfig, Thumbnail};

/// Run [`compute_filmstrip`] on tokio's blocking pool.
///
/// Takes ownership of the analysis and encoder so the work can outlive the
/// caller's stack frame.
pub async fn compute_filmstrip_async<F, E>(
    analysis: TraceAnalysis<F>,
    encoder: E,
    config: FilmstripConfig,
) -> Result<Vec<Thumbnail>>
where
    F: RenderFrame + Send + 'static,
    E: ImageEncoder + Send + 'static,
{
    tokio::task::spawn_blocking(move || compute_filmstrip(&analysis, &encoder, &config))
        .await
        .map_err(|e| Error::Other(format!("filmstrip task failed: {}", e)))?
}
