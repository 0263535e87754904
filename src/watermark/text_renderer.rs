//! Text watermark rendering.
//!
//! A text watermark is an SVG document the size of the source image holding
//! a single styled `<text>` element. Placement is baked into the markup
//! (`x`, `y`, `text-anchor`), so the rasterized layer always composites at
//! offset (0, 0). The background stays transparent outside the glyphs.
//!
//! Font family is fixed to the generic `sans-serif`. There is no wrapping,
//! measuring or truncation: long strings run past the canvas edge.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::text_renderer::{build_text_svg, rasterize_svg};
//!
//! let svg = build_text_svg(&canvas, &settings);
//! let layer = rasterize_svg(&svg, &canvas)?;
//! ```

use super::geometry::{resolve_text_placement, ImageDimensions};
use super::{WatermarkError, WatermarkSettings};
use image::{Rgba, RgbaImage};
use resvg::usvg;
use resvg::usvg::fontdb;
use std::sync::{Arc, OnceLock};

const FONT_FAMILY: &str = "sans-serif";

/// Families tried, in order, for the generic `sans-serif` family.
const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
];

static FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System font database, loaded once on first use.
fn font_database() -> Arc<fontdb::Database> {
    FONT_DB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();

            let has_family = |name: &str| {
                db.faces()
                    .any(|face| face.families.iter().any(|(family, _)| family == name))
            };
            if let Some(family) = SANS_SERIF_CANDIDATES.iter().find(|f| has_family(f)) {
                db.set_sans_serif_family(*family);
            }

            tracing::debug!(faces = db.len(), "Loaded system fonts for text watermarks");
            Arc::new(db)
        })
        .clone()
}

/// Build the SVG markup for a text watermark covering `canvas`.
pub fn build_text_svg(canvas: &ImageDimensions, settings: &WatermarkSettings) -> String {
    let placement = resolve_text_placement(
        settings.position,
        canvas,
        settings.margin,
        settings.font_size,
    );

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#,
            "<style>",
            ".watermark {{ fill: {color}; font-size: {size}px; font-family: {family}; opacity: {opacity}; }}",
            "</style>",
            r#"<text x="{x}" y="{y}" class="watermark" text-anchor="{anchor}">{text}</text>"#,
            "</svg>"
        ),
        width = canvas.width,
        height = canvas.height,
        color = escape_css(&settings.font_color),
        size = settings.font_size,
        family = FONT_FAMILY,
        opacity = settings.opacity,
        x = placement.x,
        y = placement.y,
        anchor = placement.anchor.as_svg(),
        text = quick_xml::escape::escape(settings.text.as_str()),
    )
}

/// Rasterize SVG markup onto a transparent canvas of exactly `canvas` size.
///
/// The returned pixels are straight (not premultiplied) RGBA.
pub fn rasterize_svg(svg: &str, canvas: &ImageDimensions) -> Result<RgbaImage, WatermarkError> {
    let mut options = usvg::Options::default();
    options.fontdb = font_database();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| WatermarkError::Render(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(canvas.width, canvas.height).ok_or_else(|| {
        WatermarkError::Render(format!(
            "Failed to allocate {}x{} text layer",
            canvas.width, canvas.height
        ))
    })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut layer = RgbaImage::new(canvas.width, canvas.height);
    for (dst, src) in layer.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    Ok(layer)
}

/// Render the text watermark layer for `canvas`.
///
/// Fails with `WatermarkError::Render` when there is text to draw but no
/// installed font resolves for the sans-serif family; the rasterizer would
/// otherwise drop the text without reporting it.
pub fn render_text_layer(
    canvas: &ImageDimensions,
    settings: &WatermarkSettings,
) -> Result<RgbaImage, WatermarkError> {
    if !settings.text.trim().is_empty() {
        ensure_font_available(&font_database())?;
    }

    let svg = build_text_svg(canvas, settings);
    rasterize_svg(&svg, canvas)
}

fn ensure_font_available(db: &fontdb::Database) -> Result<(), WatermarkError> {
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..Default::default()
    };

    match db.query(&query) {
        Some(_) => Ok(()),
        None => Err(WatermarkError::Render(format!(
            "no installed font matches the '{}' family ({} faces loaded)",
            FONT_FAMILY,
            db.len()
        ))),
    }
}

/// Keep a color value from closing the CSS rule or the `<style>` element.
fn escape_css(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '&'))
        .collect()
}
