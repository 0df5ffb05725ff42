//! Capability traits the pipeline does its I/O through.
//!
//! | Capability | Trait | Production implementation |
//! |---|---|---|
//! | Open / create files | [`FileSystem`] | [`OsFileSystem`](super::rust_backend::OsFileSystem) |
//! | Decode bytes → raster | [`Decoder`] | [`ImageCrateDecoder`](super::rust_backend::ImageCrateDecoder) |
//! | Encode raster → PNG | [`Encoder`] | [`PngTileEncoder`](super::rust_backend::PngTileEncoder) |
//! | Resample | [`Resizer`] | [`LanczosResizer`](super::rust_backend::LanczosResizer) |
//!
//! Keeping each capability narrow lets the orchestrator run entirely
//! in memory under test (see the doubles in `backend::tests`).

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Unrecognized image format")]
    UnrecognizedFormat,
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Opens input files and creates output files.
///
/// Handles are released when the returned boxes are dropped.
pub trait FileSystem {
    /// Open an existing file for reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Create a file for writing, truncating any existing file at `path`.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    /// Delete a file this run created but could not finish writing.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Decodes a byte stream into a raster, detecting the format from content.
pub trait Decoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<(DynamicImage, ImageFormat), BackendError>;
}

/// Encodes a tile into a byte sink.
pub trait Encoder {
    fn encode(&self, writer: &mut dyn Write, tile: &RgbaImage) -> Result<(), BackendError>;
}

/// Resamples an image.
///
/// Either `width` or `height` may be `0`, meaning "compute from the aspect
/// ratio"; see [`scaled_dimensions`](super::calculations::scaled_dimensions).
pub trait Resizer {
    fn resize(&self, width: u32, height: u32, image: &DynamicImage) -> DynamicImage;
}
