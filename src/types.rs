//! Shared types passed between the pipeline steps.
//!
//! The slice step produces a [`ProcessingResult`]; the orchestrator turns it
//! into files and reports each one as a [`SavedTile`].

use image::RgbaImage;
use std::path::PathBuf;

/// Position of a tile in the output grid.
///
/// `row` and `col` are 0-based. `number` is the 1-based index assigned in
/// row-major order, so `number - 1 == row * grid_size + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub row: u32,
    pub col: u32,
    pub number: u32,
}

/// Tiles cut from the cropped square, in slice order.
///
/// `tiles[i]` belongs to `coords[i]`; both vectors always have the same length.
#[derive(Debug, Clone, Default)]
pub struct ProcessingResult {
    pub tiles: Vec<RgbaImage>,
    pub coords: Vec<TileCoordinate>,
}

impl ProcessingResult {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate tiles together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (&RgbaImage, TileCoordinate)> {
        self.tiles.iter().zip(self.coords.iter().copied())
    }
}

/// A tile that was encoded and written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTile {
    pub coord: TileCoordinate,
    pub path: PathBuf,
}
