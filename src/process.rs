//! Split one image into key tiles.
//!
//! [`Service`] runs the whole pipeline for a single input file:
//!
//! ```text
//! open → decode → resize → crop → slice → save tile 1..=n
//! ```
//!
//! Each step runs to completion before the next one starts, and the first
//! failure ends the run.
//!
//! ## Output Structure
//!
//! Tiles are written next to the input, numbered row by row:
//!
//! ```text
//! photos/
//! ├── sunset.jpg        # input, never modified
//! ├── sunset_1.png      # row 0, col 0
//! ├── sunset_2.png      # row 0, col 1
//! ├── ...
//! └── sunset_9.png      # row 2, col 2
//! ```
//!
//! ## Partial Output
//!
//! Tiles are saved one at a time with no rollback. If tile N fails, tiles
//! `1..N` stay on disk and the returned error names tile N. A tile file that
//! was created but could not be fully written is removed again.

use crate::config::{ConfigError, GridConfig};
use crate::imaging::{
    BackendError, Decoder, Encoder, FileSystem, ImageCrateDecoder, LanczosResizer, OsFileSystem,
    PngTileEncoder, Resizer, crop_to_square, resize_image, split_into_tiles, tile_output_path,
};
use crate::types::{ProcessingResult, SavedTile};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("error opening image {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error decoding image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: BackendError,
    },
    #[error("error creating output file for tile {number} ({}): {source}", path.display())]
    CreateTile {
        number: u32,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error encoding tile {number} ({}): {source}", path.display())]
    EncodeTile {
        number: u32,
        path: PathBuf,
        source: BackendError,
    },
    #[error("error writing tile {number} ({}): {source}", path.display())]
    WriteTile {
        number: u32,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Number of the tile that failed, for errors raised while saving.
    pub fn tile_number(&self) -> Option<u32> {
        match self {
            ProcessError::CreateTile { number, .. }
            | ProcessError::EncodeTile { number, .. }
            | ProcessError::WriteTile { number, .. } => Some(*number),
            ProcessError::Open { .. } | ProcessError::Decode { .. } => None,
        }
    }
}

/// What one successful run did.
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub source: PathBuf,
    pub format: ImageFormat,
    pub original: (u32, u32),
    pub resized: (u32, u32),
    pub config: GridConfig,
    pub tiles: Vec<SavedTile>,
}

/// The production service type.
pub type DefaultService = Service<OsFileSystem, ImageCrateDecoder, PngTileEncoder, LanczosResizer>;

/// Splits images into tiles using injected capabilities.
pub struct Service<F, D, E, R> {
    fs: F,
    decoder: D,
    encoder: E,
    resizer: R,
    config: GridConfig,
}

impl DefaultService {
    /// Service backed by the real filesystem and the `image` crate.
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        Self::with_deps(
            OsFileSystem,
            ImageCrateDecoder,
            PngTileEncoder,
            LanczosResizer,
            config,
        )
    }
}

impl<F, D, E, R> Service<F, D, E, R>
where
    F: FileSystem,
    D: Decoder,
    E: Encoder,
    R: Resizer,
{
    /// Service with custom capabilities. Fails if `config` is invalid.
    pub fn with_deps(
        fs: F,
        decoder: D,
        encoder: E,
        resizer: R,
        config: GridConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fs,
            decoder,
            encoder,
            resizer,
            config,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Split the image at `path` into tiles written next to it.
    pub fn process_image(&self, path: &Path) -> Result<SplitReport, ProcessError> {
        let (original, format) = self.load_image(path)?;
        debug!(
            path = %path.display(),
            ?format,
            width = original.width(),
            height = original.height(),
            "decoded image"
        );

        let resized = resize_image(&original, self.config.target_size, &self.resizer);
        let resized_dims = (resized.width(), resized.height());
        debug!(width = resized_dims.0, height = resized_dims.1, "resized");

        let square = crop_to_square(&resized, self.config.target_size);
        let result = split_into_tiles(&square, &self.config);
        debug!(tiles = result.len(), "sliced");

        let tiles = self.save_tiles(&result, path)?;

        Ok(SplitReport {
            source: path.to_path_buf(),
            format,
            original: (original.width(), original.height()),
            resized: resized_dims,
            config: self.config,
            tiles,
        })
    }

    /// Open and decode. The input handle is dropped before returning.
    fn load_image(&self, path: &Path) -> Result<(DynamicImage, ImageFormat), ProcessError> {
        let mut reader = self.fs.open(path).map_err(|source| ProcessError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.decoder
            .decode(&mut reader)
            .map_err(|source| ProcessError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn save_tiles(
        &self,
        result: &ProcessingResult,
        source: &Path,
    ) -> Result<Vec<SavedTile>, ProcessError> {
        let mut saved = Vec::with_capacity(result.len());
        for (tile, coord) in result.iter() {
            let path = tile_output_path(source, coord.number);
            self.save_tile(tile, coord.number, &path)?;
            info!(number = coord.number, path = %path.display(), "wrote tile");
            saved.push(SavedTile { coord, path });
        }
        Ok(saved)
    }

    fn save_tile(&self, tile: &RgbaImage, number: u32, path: &Path) -> Result<(), ProcessError> {
        let mut writer = self
            .fs
            .create(path)
            .map_err(|source| ProcessError::CreateTile {
                number,
                path: path.to_path_buf(),
                source,
            })?;
        let written = match self.encoder.encode(&mut writer, tile) {
            Ok(()) => writer.flush().map_err(|source| ProcessError::WriteTile {
                number,
                path: path.to_path_buf(),
                source,
            }),
            Err(source) => Err(ProcessError::EncodeTile {
                number,
                path: path.to_path_buf(),
                source,
            }),
        };
        drop(writer);
        if written.is_err() {
            self.discard_partial(path);
        }
        written
    }

    fn discard_partial(&self, path: &Path) {
        if let Err(e) = self.fs.remove(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial tile");
        }
    }
}
