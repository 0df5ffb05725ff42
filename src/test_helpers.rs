//! Shared test utilities for the ccbm test suite.
//!
//! Provides synthetic images with predictable pixels, so tests can check
//! exactly which source region ended up in which tile.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let input = write_test_image(tmp.path(), "photo.jpg", 400, 300, ImageFormat::Jpeg);
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic images
// =========================================================================

/// RGB image whose red channel follows x and green channel follows y.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Square RGBA image with four solid quadrants: red, green, blue, white.
pub fn quadrant_image(size: u32) -> RgbaImage {
    let half = size / 2;
    RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
        (true, true) => Rgba([255, 0, 0, 255]),
        (false, true) => Rgba([0, 255, 0, 255]),
        (true, false) => Rgba([0, 0, 255, 255]),
        (false, false) => Rgba([255, 255, 255, 255]),
    })
}

// =========================================================================
// Encoding helpers
// =========================================================================

/// Encode `img` in `format` and return the bytes.
pub fn encode_test_image(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    // JPEG has no alpha channel
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img.clone(),
    };
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap_or_else(|e| panic!("failed to encode {format:?}: {e}"));
    bytes
}

/// Write a gradient image of the given size into `dir` and return its path.
pub fn write_test_image(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    format: ImageFormat,
) -> PathBuf {
    let path = dir.join(name);
    let bytes = encode_test_image(&gradient_image(width, height), format);
    std::fs::write(&path, bytes).unwrap();
    path
}
