//! Watermark compositor for blending overlay layers onto images.
//!
//! Layers are blended in the order they were added (last on top) with the
//! Porter-Duff "over" operator. The compositor applies no opacity of its
//! own: whatever transparency a layer has must already be in its alpha
//! channel. Text layers carry the configured opacity from their SVG style;
//! image layers keep the overlay image's own alpha untouched.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::compositor::{Compositor, WatermarkLayer};
//!
//! let mut compositor = Compositor::new();
//! compositor.add_layer(WatermarkLayer::new(overlay, PlacementPosition::new(680, 780)));
//! let result = compositor.apply_to_dynamic(&source);
//! ```

use super::geometry::{ImageDimensions, PlacementPosition};
use image::{DynamicImage, Rgba, RgbaImage};

/// A rendered overlay and where its top-left corner goes on the canvas.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The overlay raster (straight RGBA).
    pub image: RgbaImage,
    /// Offset into the canvas. May be negative or past the far edge.
    pub position: PlacementPosition,
}

impl WatermarkLayer {
    pub fn new(image: RgbaImage, position: PlacementPosition) -> Self {
        Self { image, position }
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.image.width(), self.image.height())
    }
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .finish()
    }
}

/// Compositor for stacking overlay layers onto an image.
#[derive(Debug, Default)]
pub struct Compositor {
    layers: Vec<WatermarkLayer>,
}

impl Compositor {
    /// Create a new compositor with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top of the ones already added.
    pub fn add_layer(&mut self, layer: WatermarkLayer) {
        self.layers.push(layer);
    }

    /// Blend all layers onto the target image, first added first.
    pub fn apply(&self, target: &mut RgbaImage) {
        for layer in &self.layers {
            blend_layer(target, layer);
        }
    }

    /// Blend all layers and return the result as a new image.
    pub fn apply_to_dynamic(&self, target: &DynamicImage) -> DynamicImage {
        let mut rgba = target.to_rgba8();
        self.apply(&mut rgba);
        DynamicImage::ImageRgba8(rgba)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[WatermarkLayer] {
        &self.layers
    }
}

/// Blend a single layer onto the target, clipped to the target bounds.
fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let target_width = i64::from(target.width());
    let target_height = i64::from(target.height());

    let left = layer.position.left;
    let top = layer.position.top;

    // Visible region in canvas coordinates
    let x_start = left.max(0);
    let y_start = top.max(0);
    let x_end = (left + i64::from(layer.image.width())).min(target_width);
    let y_end = (top + i64::from(layer.image.height())).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = layer.image.get_pixel((tx - left) as u32, (ty - top) as u32);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *wm_pixel);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Porter-Duff "over": result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
