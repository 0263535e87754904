//! Output encoding for composited images.
//!
//! The output keeps the source's format where an encoder exists for it
//! (JPEG, PNG, WebP); anything else is written as PNG.

use super::WatermarkError;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// JPEG quality used for watermarked output.
pub const JPEG_QUALITY: u8 = 80;

/// Output format of a watermarked image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Pick the output format for a source decoded as `format`.
    pub fn for_source(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Jpeg) => Self::Jpeg,
            Some(ImageFormat::WebP) => Self::WebP,
            _ => Self::Png,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

/// Trait for output encoders.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode an RGBA raster to the target format
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, WatermarkError>;
}

/// JPEG encoder; drops the alpha channel.
pub struct JpegEncoder {
    pub quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;

        let rgb_data = rgba_to_rgb(image.as_raw());

        let mut output = Cursor::new(Vec::new());
        ImageJpegEncoder::new_with_quality(&mut output, self.quality)
            .write_image(
                &rgb_data,
                image.width(),
                image.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| WatermarkError::encode("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// PNG encoder.
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        ImagePngEncoder::new(&mut output)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| WatermarkError::encode("png", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Lossless WebP encoder.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        ImageWebPEncoder::new_lossless(&mut output)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| WatermarkError::encode("webp", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Jpeg => Box::new(JpegEncoder::default()),
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::WebP => Box::new(WebPEncoder),
        }
    }
}

/// Convert RGBA to RGB by discarding the alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}
