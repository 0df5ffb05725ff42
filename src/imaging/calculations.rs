//! Pure calculation functions for the resize, crop and slice steps.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::config::GridConfig;
use crate::types::TileCoordinate;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Which axis the resize step pins to the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedAxis {
    Width,
    Height,
}

/// Choose the resize request for an image of `original` dimensions.
///
/// Landscape images get their height pinned; portrait and square images get
/// their width pinned. The free axis is `0`, meaning "compute from ratio".
///
/// # Returns
/// * `(axis, (width, height))` - The pinned axis and the resizer request
pub fn resize_request(original: (u32, u32), target: u32) -> (FixedAxis, (u32, u32)) {
    let (orig_w, orig_h) = original;
    if orig_w > orig_h {
        (FixedAxis::Height, (0, target))
    } else {
        (FixedAxis::Width, (target, 0))
    }
}

/// Resolve a resize request where either side may be `0`.
///
/// A `0` side is computed from the original aspect ratio and rounded, but
/// never drops below 1px. When both sides are `0` the original size is kept.
pub fn scaled_dimensions(original: (u32, u32), requested: (u32, u32)) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    match requested {
        (0, 0) => original,
        (0, h) => {
            let w = (h as f64 * orig_w as f64 / orig_h.max(1) as f64).round() as u32;
            (w.max(1), h)
        }
        (w, 0) => {
            let h = (w as f64 * orig_h as f64 / orig_w.max(1) as f64).round() as u32;
            (w, h.max(1))
        }
        exact => exact,
    }
}

/// Top-left corner of the centered `target × target` square.
///
/// Uses truncating division. Offsets are negative when a side is smaller than
/// `target`; the crop step fills the uncovered area with transparent pixels.
pub fn center_offset(dimensions: (u32, u32), target: u32) -> (i64, i64) {
    let (w, h) = dimensions;
    let target = i64::from(target);
    ((i64::from(w) - target) / 2, (i64::from(h) - target) / 2)
}

/// Source origin of the tile at `(row, col)` inside the square.
///
/// Saturates for geometries that never passed validation.
pub fn tile_origin(row: u32, col: u32, config: &GridConfig) -> (i64, i64) {
    let pitch = i64::try_from(config.pitch()).unwrap_or(i64::MAX);
    (
        i64::from(col).saturating_mul(pitch),
        i64::from(row).saturating_mul(pitch),
    )
}

/// All tile coordinates of the grid, in row-major order, numbered from 1.
pub fn tile_coordinates(grid_size: u32) -> Vec<TileCoordinate> {
    (0..grid_size)
        .flat_map(|row| (0..grid_size).map(move |col| (row, col)))
        .zip(1..)
        .map(|((row, col), number)| TileCoordinate { row, col, number })
        .collect()
}

/// Output path for a tile: `<dir>/<stem>_<number>.png` next to the input.
///
/// # Examples
/// ```
/// # use ccbm::imaging::tile_output_path;
/// # use std::path::{Path, PathBuf};
/// assert_eq!(
///     tile_output_path(Path::new("/photos/sunset.jpg"), 3),
///     PathBuf::from("/photos/sunset_3.png"),
/// );
/// ```
pub fn tile_output_path(input: &Path, number: u32) -> PathBuf {
    // Stem bytes are kept as-is, even when they are not valid UTF-8
    let mut name = input.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    name.push(format!("_{number}.png"));
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
