//! Watermark error types.
//!
//! Defines errors that can occur while watermarking a single image. None of
//! them is fatal to a batch: the batch runner logs the error with the source
//! path and moves on to the next image.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Source or watermark bytes are not a readable image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Metadata was read but carries no usable width/height
    #[error("Image metadata has no dimensions: {0}")]
    MissingDimensions(String),

    /// The composite could not be serialized
    #[error("Failed to encode {format}: {message}")]
    Encode { format: String, message: String },

    /// Filesystem read or write failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SVG text layer could not be rasterized
    #[error("Failed to render text watermark: {0}")]
    Render(String),

    /// Overlay image could not be resized to its target size
    #[error("Failed to resize watermark image: {0}")]
    Resize(String),

    /// Invalid options for the active watermark kind
    #[error("Watermark configuration error: {0}")]
    Config(String),
}

impl WatermarkError {
    pub fn encode(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
