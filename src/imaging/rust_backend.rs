//! Production capabilities backed by `std::fs` and the `image` crate.
//!
//! ## Crate mapping
//!
//! | Capability | Crate / function |
//! |---|---|
//! | Open / create / remove | `std::fs::File`, buffered; `std::fs::remove_file` |
//! | Decode (JPEG, PNG, GIF, BMP) | `image::ImageReader::with_guessed_format` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |

use super::backend::{BackendError, Decoder, Encoder, FileSystem, Resizer};
use super::calculations::scaled_dimensions;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, RgbaImage};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

/// Formats the decoder is compiled with.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Real filesystem access.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Decoder for every format in [`SUPPORTED_FORMATS`], detected from the
/// leading bytes rather than the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl Decoder for ImageCrateDecoder {
    fn decode(&self, reader: &mut dyn Read) -> Result<(DynamicImage, ImageFormat), BackendError> {
        // ImageReader needs Seek; the input is read fully once.
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format().ok_or(BackendError::UnrecognizedFormat)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported input format: {:?}",
                format
            )));
        }
        let image = reader.decode()?;
        Ok((image, format))
    }
}

/// Lossless PNG encoding of RGBA tiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngTileEncoder;

impl Encoder for PngTileEncoder {
    fn encode(&self, writer: &mut dyn Write, tile: &RgbaImage) -> Result<(), BackendError> {
        PngEncoder::new(writer).write_image(
            tile.as_raw(),
            tile.width(),
            tile.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Lanczos3 resampling.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanczosResizer;

impl Resizer for LanczosResizer {
    fn resize(&self, width: u32, height: u32, image: &DynamicImage) -> DynamicImage {
        let (w, h) = scaled_dimensions((image.width(), image.height()), (width, height));
        if (w, h) == (image.width(), image.height()) {
            return image.clone();
        }
        image.resize_exact(w, h, FilterType::Lanczos3)
    }
}
