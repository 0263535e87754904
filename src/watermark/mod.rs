//! Watermark compositing engine.
//!
//! Applies a single text or image watermark to a source image.
//!
//! # Features
//!
//! - **Text watermarks** rendered from an SVG text element covering the
//!   whole canvas (font size, color and opacity configurable)
//! - **Image watermarks** scaled to a fraction of the source width, keeping
//!   the overlay's own aspect ratio
//! - **4 anchor corners** with a pixel margin from the anchor edges
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   type: text
//!   text: "© Example"
//!   font_size: 24
//!   position: bottom-right
//!   margin: 16
//! ```
//!
//! `opacity` only affects text watermarks. Image watermarks are composited
//! with the overlay image's own alpha channel.

pub mod compositor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod processor;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{Compositor, WatermarkLayer};
pub use config::{WatermarkKind, WatermarkOptions, WatermarkPosition, WatermarkSettings};
pub use encoder::{EncoderFactory, ImageEncoder, OutputFormat};
pub use error::WatermarkError;
pub use geometry::{
    is_visible, resolve_offset, resolve_scaled_size, resolve_text_placement, ImageDimensions,
    PlacementPosition, TextAnchor, TextPlacement,
};
pub use processor::{
    decode_image, read_metadata, resize_overlay, watermark, ImageMetadata, WatermarkProcessor,
};
pub use text_renderer::{build_text_svg, rasterize_svg, render_text_layer};
