// Test utilities: write source images into a temporary directory

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

pub fn encode(img: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, format)
        .expect("Failed to encode test image");
    buffer.into_inner()
}

/// Write a solid-color PNG and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode(RgbaImage::from_pixel(width, height, color), ImageFormat::Png);
    std::fs::write(&path, bytes).expect("Failed to write test image");
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

pub fn load(path: &Path) -> RgbaImage {
    image::open(path)
        .expect("Failed to open output image")
        .to_rgba8()
}

pub fn load_bytes(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("Failed to decode output image")
        .to_rgba8()
}

/// Channel-wise comparison with a small tolerance for resampling error.
pub fn close_to(actual: Rgba<u8>, expected: Rgba<u8>) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 3)
}
