//! Error types for filmstrip extraction

use thiserror::Error;

/// Result type alias for filmstrip operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting a filmstrip
///
/// None of these are recoverable locally: the filmstrip is an all-or-nothing
/// computation, so every variant aborts the whole invocation rather than
/// producing a short or degraded thumbnail set.
#[derive(Error, Debug)]
pub enum Error {
    /// The trace has no usable frames for one of the sampled instants
    #[error("No usable frame: {0}")]
    InputUnavailable(String),

    /// A selected frame's raster could not be decoded
    #[error("Frame decode failed: {0}")]
    DecodeFailure(String),

    /// The external image encoder failed
    #[error("Thumbnail encode failed: {0}")]
    EncodeFailure(String),

    /// A raster's pixel buffer does not match its declared dimensions
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
