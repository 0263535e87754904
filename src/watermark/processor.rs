//! Watermark processor: decode → render overlay → composite → encode.
//!
//! The pure core is [`WatermarkProcessor::process_bytes`], which works on
//! in-memory buffers only. [`WatermarkProcessor::process_file`] and the
//! [`watermark`] entry point add the file reads around it; those reads are
//! the only suspension points.
//!
//! # Example
//!
//! ```ignore
//! use watermarker::watermark::{watermark, WatermarkOptions};
//!
//! let bytes = watermark("photos/cat.jpg", &WatermarkOptions::default()).await?;
//! ```

use super::compositor::{Compositor, WatermarkLayer};
use super::encoder::{EncoderFactory, OutputFormat};
use super::geometry::{
    is_visible, resolve_offset, resolve_scaled_size, ImageDimensions, PlacementPosition,
};
use super::text_renderer::render_text_layer;
use super::{WatermarkError, WatermarkKind, WatermarkOptions, WatermarkSettings};
use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::num::NonZeroU32;
use std::path::Path;

/// Dimensions and container format read from encoded image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
}

impl ImageMetadata {
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Read width, height and format without decoding the pixel data.
pub fn read_metadata(data: &[u8]) -> Result<ImageMetadata, WatermarkError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?;

    let format = reader.format();
    if format.is_none() {
        return Err(WatermarkError::Decode(
            "unrecognized image format".to_string(),
        ));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(WatermarkError::MissingDimensions(format!(
            "decoded size is {}x{}",
            width, height
        )));
    }

    Ok(ImageMetadata {
        width,
        height,
        format,
    })
}

/// Decode image data into a DynamicImage
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, WatermarkError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| WatermarkError::Decode(e.to_string()))
}

/// Resize an overlay to exactly `target` with a Lanczos3 filter.
pub fn resize_overlay(
    img: &DynamicImage,
    target: &ImageDimensions,
) -> Result<RgbaImage, WatermarkError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| WatermarkError::Resize("source width is 0".to_string()))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| WatermarkError::Resize("source height is 0".to_string()))?;
    let dst_width = NonZeroU32::new(target.width)
        .ok_or_else(|| WatermarkError::Resize("target width is 0".to_string()))?;
    let dst_height = NonZeroU32::new(target.height)
        .ok_or_else(|| WatermarkError::Resize("target height is 0".to_string()))?;

    let mut src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| WatermarkError::Resize(format!("failed to create source image: {:?}", e)))?;

    // Resample premultiplied so transparent pixels do not bleed color
    let alpha_mul_div = MulDiv::default();
    alpha_mul_div
        .multiply_alpha_inplace(&mut src_image.view_mut())
        .map_err(|e| WatermarkError::Resize(format!("{:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);
    let mut dst_view = dst_image.view_mut();

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_view)
        .map_err(|e| WatermarkError::Resize(format!("resize operation failed: {:?}", e)))?;

    alpha_mul_div
        .divide_alpha_inplace(&mut dst_view)
        .map_err(|e| WatermarkError::Resize(format!("{:?}", e)))?;

    RgbaImage::from_raw(target.width, target.height, dst_image.into_vec())
        .ok_or_else(|| WatermarkError::Resize("failed to create output image buffer".to_string()))
}

/// Applies one watermark configuration to any number of images.
#[derive(Debug, Clone)]
pub struct WatermarkProcessor {
    settings: WatermarkSettings,
}

impl WatermarkProcessor {
    /// Create a processor, validating the fields of the active kind.
    pub fn new(settings: WatermarkSettings) -> Result<Self, WatermarkError> {
        settings.validate().map_err(WatermarkError::Config)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &WatermarkSettings {
        &self.settings
    }

    /// Watermark the image at `source_path` and return the encoded result.
    pub async fn process_file(&self, source_path: &Path) -> Result<Vec<u8>, WatermarkError> {
        let source = tokio::fs::read(source_path)
            .await
            .map_err(|e| WatermarkError::io(source_path, e))?;

        let overlay = match self.overlay_path() {
            Some(path) => Some(
                tokio::fs::read(path)
                    .await
                    .map_err(|e| WatermarkError::io(path, e))?,
            ),
            None => None,
        };

        self.process_bytes(&source, overlay.as_deref())
    }

    /// Watermark encoded `source` bytes. `overlay` holds the encoded overlay
    /// image in image mode and is ignored in text mode.
    pub fn process_bytes(
        &self,
        source: &[u8],
        overlay: Option<&[u8]>,
    ) -> Result<Vec<u8>, WatermarkError> {
        let metadata = read_metadata(source)?;
        let image = decode_image(source)?;
        let canvas = metadata.dimensions();

        let mut compositor = Compositor::new();
        if let Some(layer) = self.build_layer(&canvas, overlay)? {
            compositor.add_layer(layer);
        }

        let composited = compositor.apply_to_dynamic(&image).to_rgba8();

        let format = OutputFormat::for_source(metadata.format);
        let encoded = EncoderFactory::create(format).encode(&composited)?;

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            kind = %self.settings.kind,
            format = format.as_str(),
            bytes = encoded.len(),
            "Watermark applied"
        );

        Ok(encoded)
    }

    /// Path of the overlay image to read, if the active kind needs one.
    fn overlay_path(&self) -> Option<&Path> {
        match self.settings.kind {
            WatermarkKind::Image if !self.settings.image_path.is_empty() => {
                Some(Path::new(&self.settings.image_path))
            }
            _ => None,
        }
    }

    fn build_layer(
        &self,
        canvas: &ImageDimensions,
        overlay: Option<&[u8]>,
    ) -> Result<Option<WatermarkLayer>, WatermarkError> {
        match self.settings.kind {
            WatermarkKind::Text => {
                let image = render_text_layer(canvas, &self.settings)?;
                Ok(Some(WatermarkLayer::new(image, PlacementPosition::default())))
            }
            WatermarkKind::Image => match overlay {
                Some(bytes) => self.build_image_layer(canvas, bytes).map(Some),
                None => {
                    tracing::warn!("Image watermark has no image_path, leaving image unchanged");
                    Ok(None)
                }
            },
        }
    }

    fn build_image_layer(
        &self,
        canvas: &ImageDimensions,
        overlay: &[u8],
    ) -> Result<WatermarkLayer, WatermarkError> {
        let overlay_metadata = read_metadata(overlay).map_err(|e| match e {
            WatermarkError::Decode(msg) => WatermarkError::Decode(format!("watermark image: {}", msg)),
            other => other,
        })?;
        let overlay_image = decode_image(overlay)
            .map_err(|e| WatermarkError::Decode(format!("watermark image: {}", e)))?;

        let scaled = resolve_scaled_size(
            canvas.width,
            self.settings.scale,
            &overlay_metadata.dimensions(),
        );
        let resized = resize_overlay(&overlay_image, &scaled)?;
        let position = resolve_offset(self.settings.position, canvas, &scaled, self.settings.margin);

        if !is_visible(&position, canvas, &scaled) {
            tracing::warn!(
                top = position.top,
                left = position.left,
                width = scaled.width,
                height = scaled.height,
                "Watermark overlay lies entirely outside the image"
            );
        }

        Ok(WatermarkLayer::new(resized, position))
    }
}

/// Watermark the image at `source_path` with `options`, unset fields taking
/// their defaults. Returns the encoded composite.
pub async fn watermark(
    source_path: impl AsRef<Path>,
    options: &WatermarkOptions,
) -> Result<Vec<u8>, WatermarkError> {
    WatermarkProcessor::new(options.resolve())?
        .process_file(source_path.as_ref())
        .await
}
