//! Geometry calculation for watermark placement.
//!
//! Pure functions mapping canvas size, overlay size and options to pixel
//! placement. No I/O.
//!
//! # Example
//!
//! ```
//! use watermarker::watermark::geometry::{resolve_offset, resolve_scaled_size, ImageDimensions};
//! use watermarker::watermark::WatermarkPosition;
//!
//! let canvas = ImageDimensions::new(1000, 800);
//! let layer = resolve_scaled_size(canvas.width, 0.2, &ImageDimensions::new(500, 250));
//! assert_eq!((layer.width, layer.height), (200, 100));
//!
//! let pos = resolve_offset(WatermarkPosition::BottomRight, &canvas, &layer, 20);
//! assert_eq!((pos.top, pos.left), (680, 780));
//! ```

use super::WatermarkPosition;
use serde::Serialize;

/// Pixel dimensions of an image or overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left offset of a layer on the canvas. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlacementPosition {
    pub top: i64,
    pub left: i64,
}

impl PlacementPosition {
    pub fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }
}

/// Horizontal alignment of the glyph run relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    /// Value for the SVG `text-anchor` attribute.
    pub fn as_svg(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Glyph anchor point inside a full-canvas text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPlacement {
    pub x: i64,
    /// Baseline.
    pub y: i64,
    pub anchor: TextAnchor,
}

/// Calculate the top-left offset of a layer anchored at `position`.
///
/// The result is not clamped: an overlay wider or taller than the canvas
/// minus the margin gets a negative offset and ends up partly or fully
/// off-canvas.
pub fn resolve_offset(
    position: WatermarkPosition,
    canvas: &ImageDimensions,
    layer: &ImageDimensions,
    margin: u32,
) -> PlacementPosition {
    let m = i64::from(margin);

    let top = if position.is_bottom() {
        i64::from(canvas.height) - i64::from(layer.height) - m
    } else {
        m
    };

    let left = if position.is_right() {
        i64::from(canvas.width) - i64::from(layer.width) - m
    } else {
        m
    };

    PlacementPosition::new(top, left)
}

/// Calculate the target size of an image overlay.
///
/// Width is `source_width * scale`; height keeps the overlay's own aspect
/// ratio. Both are rounded to the nearest pixel.
pub fn resolve_scaled_size(
    source_width: u32,
    scale: f32,
    intrinsic: &ImageDimensions,
) -> ImageDimensions {
    let scaled_width = (f64::from(source_width) * f64::from(scale)).round();
    let scaled_height = if intrinsic.width == 0 {
        0.0
    } else {
        (scaled_width * f64::from(intrinsic.height) / f64::from(intrinsic.width)).round()
    };

    ImageDimensions::new(to_pixels(scaled_width), to_pixels(scaled_height))
}

/// Calculate the glyph anchor for a text layer that covers the whole canvas.
///
/// The baseline sits `font_size` below the top margin for top anchors so
/// the glyph ascent stays inside the margin. Right anchors use
/// `TextAnchor::End` so the text grows leftwards from `x` without measuring it.
pub fn resolve_text_placement(
    position: WatermarkPosition,
    canvas: &ImageDimensions,
    margin: u32,
    font_size: u32,
) -> TextPlacement {
    let m = i64::from(margin);

    let x = if position.is_right() {
        i64::from(canvas.width) - m
    } else {
        m
    };

    let y = if position.is_bottom() {
        i64::from(canvas.height) - m
    } else {
        m + i64::from(font_size)
    };

    let anchor = if position.is_right() {
        TextAnchor::End
    } else {
        TextAnchor::Start
    };

    TextPlacement { x, y, anchor }
}

/// Check if a layer at `pos` covers at least one canvas pixel.
pub fn is_visible(
    pos: &PlacementPosition,
    canvas: &ImageDimensions,
    layer: &ImageDimensions,
) -> bool {
    let right = pos.left + i64::from(layer.width);
    let bottom = pos.top + i64::from(layer.height);

    pos.left < i64::from(canvas.width)
        && pos.top < i64::from(canvas.height)
        && right > 0
        && bottom > 0
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
