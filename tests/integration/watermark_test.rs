//! Watermark end-to-end tests
//!
//! Runs the public `watermark` entry point against real files:
//!   source file -> decode -> overlay -> composite -> encode

use super::test_harness::{close_to, load_bytes, write_file, write_png, BLUE, WHITE};
use image::ImageFormat;
use tempfile::TempDir;
use watermarker::watermark::{
    watermark, WatermarkError, WatermarkKind, WatermarkOptions, WatermarkPosition,
};

fn image_options(overlay: &std::path::Path) -> WatermarkOptions {
    WatermarkOptions {
        kind: Some(WatermarkKind::Image),
        image_path: Some(overlay.to_string_lossy().into_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_image_overlay_lands_in_bottom_right() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 1000, 800, WHITE);
    let overlay = write_png(dir.path(), "logo.png", 500, 250, BLUE);

    let output = watermark(&source, &image_options(&overlay)).await.unwrap();
    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);

    let img = load_bytes(&output);
    assert_eq!(img.dimensions(), (1000, 800));

    // Overlay is 200x100 at top 680, left 780
    assert!(close_to(*img.get_pixel(880, 730), BLUE));
    assert!(close_to(*img.get_pixel(785, 685), BLUE));
    assert!(close_to(*img.get_pixel(975, 775), BLUE));

    // Margin strip and the rest of the canvas are untouched
    assert_eq!(*img.get_pixel(990, 790), WHITE);
    assert_eq!(*img.get_pixel(770, 730), WHITE);
    assert_eq!(*img.get_pixel(10, 10), WHITE);
}

#[tokio::test]
async fn test_image_overlay_top_left_with_zero_margin() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 200, 100, WHITE);
    let overlay = write_png(dir.path(), "logo.png", 10, 10, BLUE);

    let options = WatermarkOptions {
        position: Some(WatermarkPosition::TopLeft),
        margin: Some(0),
        scale: Some(0.5),
        ..image_options(&overlay)
    };
    let img = load_bytes(&watermark(&source, &options).await.unwrap());

    // 100x100 overlay flush with the top-left corner
    assert!(close_to(*img.get_pixel(0, 0), BLUE));
    assert!(close_to(*img.get_pixel(99, 99), BLUE));
    assert_eq!(*img.get_pixel(101, 50), WHITE);
}

#[tokio::test]
async fn test_missing_overlay_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 64, 64, WHITE);
    let options = image_options(&dir.path().join("nope.png"));

    let result = watermark(&source, &options).await;
    assert!(matches!(result, Err(WatermarkError::Io { .. })));
}

#[tokio::test]
async fn test_missing_source_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = watermark(dir.path().join("gone.png"), &WatermarkOptions::default()).await;
    assert!(matches!(result, Err(WatermarkError::Io { .. })));
}

#[tokio::test]
async fn test_corrupt_source_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let source = write_file(dir.path(), "broken.png", b"not really a png");

    let result = watermark(&source, &WatermarkOptions::default()).await;
    assert!(matches!(result, Err(WatermarkError::Decode(_))));
}

#[tokio::test]
async fn test_text_watermark_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 320, 200, BLUE);
    let options = WatermarkOptions {
        text: Some("Sample".to_string()),
        font_color: Some("#ff0000".to_string()),
        ..Default::default()
    };

    let first = watermark(&source, &options).await.unwrap();
    let second = watermark(&source, &options).await.unwrap();
    assert_eq!(first, second);

    let img = load_bytes(&first);
    assert_eq!(img.dimensions(), (320, 200));
    // Far from the bottom-right text anchor nothing changes
    assert_eq!(*img.get_pixel(5, 5), BLUE);
}

#[tokio::test]
async fn test_text_watermark_changes_pixels_near_anchor() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 320, 200, BLUE);
    let options = WatermarkOptions {
        font_color: Some("#ffffff".to_string()),
        opacity: Some(1.0),
        ..Default::default()
    };

    let img = load_bytes(&watermark(&source, &options).await.unwrap());
    let changed: Vec<(u32, u32)> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| **p != BLUE)
        .map(|(x, y, _)| (x, y))
        .collect();

    assert!(!changed.is_empty(), "no text was drawn");
    // "Watermark" ends at x = 320 - 20 with its baseline at y = 200 - 20
    for &(x, y) in &changed {
        assert!(x <= 301, "pixel ({x}, {y}) right of the margin");
        assert!(y <= 182, "pixel ({x}, {y}) below the margin");
        assert!(y >= 140, "pixel ({x}, {y}) far above the baseline");
    }
}

#[tokio::test]
async fn test_zero_opacity_text_leaves_image_unchanged() {
    let dir = TempDir::new().unwrap();
    let source = write_png(dir.path(), "photo.png", 120, 80, WHITE);
    let options = WatermarkOptions {
        opacity: Some(0.0),
        font_color: Some("#000000".to_string()),
        ..Default::default()
    };

    let img = load_bytes(&watermark(&source, &options).await.unwrap());
    assert!(img.pixels().all(|p| *p == WHITE));
}
