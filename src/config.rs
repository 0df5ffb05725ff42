//! Grid geometry configuration.
//!
//! The four numbers that drive the transform live in [`GridConfig`]. They are
//! resolved in layers, each one overriding the last:
//!
//! ```text
//! stock defaults (378 / 3 / 116 / 15)
//!   → --preset                       (standard | wide)
//!     → ccbm.toml                    (--config PATH, or next to the image)
//!       → --target-size, --grid-size, --tile-size, --spacing
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All keys are optional - defaults shown below
//! target_size = 378   # Side of the intermediate square, in pixels
//! grid_size = 3       # Rows = columns of the tile grid
//! tile_size = 116     # Side of each output tile, in pixels
//! spacing = 15        # Gap skipped between adjacent tiles, in pixels
//! ```
//!
//! Files are sparse: override just the keys you want. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up next to the input image when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "ccbm.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Geometry of the square and the tile grid cut out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Side of the intermediate square, in pixels.
    pub target_size: u32,
    /// Number of rows (and columns) in the tile grid.
    pub grid_size: u32,
    /// Side of each output tile, in pixels.
    pub tile_size: u32,
    /// Pixels skipped between adjacent tiles.
    pub spacing: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Preset::Standard.config()
    }
}

impl GridConfig {
    pub fn new(target_size: u32, grid_size: u32, tile_size: u32, spacing: u32) -> Self {
        Self {
            target_size,
            grid_size,
            tile_size,
            spacing,
        }
    }

    /// Distance between the origins of two neighbouring tiles.
    pub fn pitch(&self) -> u64 {
        u64::from(self.tile_size) + u64::from(self.spacing)
    }

    /// Pixels covered along one axis by all tiles and the gaps between them.
    ///
    /// Saturates instead of wrapping, so absurd values still fail validation.
    pub fn footprint(&self) -> u64 {
        let grid = u64::from(self.grid_size);
        let tiles = grid.saturating_mul(u64::from(self.tile_size));
        let gaps = grid.saturating_sub(1).saturating_mul(u64::from(self.spacing));
        tiles.saturating_add(gaps)
    }

    /// Reject geometries that would produce empty or overrunning tiles.
    ///
    /// A grid smaller than the square is allowed; the leftover border is
    /// simply not part of any tile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 {
            return Err(ConfigError::Validation(
                "target_size must be greater than 0".into(),
            ));
        }
        if self.grid_size == 0 {
            return Err(ConfigError::Validation(
                "grid_size must be greater than 0".into(),
            ));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Validation(
                "tile_size must be greater than 0".into(),
            ));
        }
        if self.footprint() > u64::from(self.target_size) {
            return Err(ConfigError::Validation(format!(
                "{grid}x{grid} tiles of {tile}px with {gap}px spacing need {need}px, \
                 but target_size is {target}px",
                grid = self.grid_size,
                tile = self.tile_size,
                gap = self.spacing,
                need = self.footprint(),
                target = self.target_size,
            )));
        }
        Ok(())
    }
}

/// Built-in geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// 378px square, 3x3 tiles of 116px, 15px apart.
    #[default]
    Standard,
    /// 484px square, 3x3 tiles of 116px, 68px apart.
    Wide,
}

impl Preset {
    pub fn config(self) -> GridConfig {
        match self {
            Preset::Standard => GridConfig::new(378, 3, 116, 15),
            Preset::Wide => GridConfig::new(484, 3, 116, 68),
        }
    }
}

/// Per-field overrides, the last configuration layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOverrides {
    pub target_size: Option<u32>,
    pub grid_size: Option<u32>,
    pub tile_size: Option<u32>,
    pub spacing: Option<u32>,
}

impl GridOverrides {
    pub fn apply(&self, config: GridConfig) -> GridConfig {
        GridConfig {
            target_size: self.target_size.unwrap_or(config.target_size),
            grid_size: self.grid_size.unwrap_or(config.grid_size),
            tile_size: self.tile_size.unwrap_or(config.tile_size),
            spacing: self.spacing.unwrap_or(config.spacing),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn read_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Path of `ccbm.toml` in `dir`, if there is one.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Merge an optional overlay onto `base` and deserialize.
///
/// The result is not validated; flags applied afterwards may still fix it.
pub fn merge_config(
    base: GridConfig,
    overlay: Option<toml::Value>,
) -> Result<GridConfig, ConfigError> {
    let base = toml::Value::try_from(base)?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Layer `overlay` and then `overrides` on `base`, validating only the
/// final geometry.
pub fn resolve_config(
    base: GridConfig,
    overlay: Option<toml::Value>,
    overrides: &GridOverrides,
) -> Result<GridConfig, ConfigError> {
    let config = overrides.apply(merge_config(base, overlay)?);
    config.validate()?;
    Ok(config)
}

/// Resolve the geometry for an image living in `dir`.
///
/// `explicit` is read when given; otherwise `ccbm.toml` in `dir` is used if
/// present. A missing file just means no file layer.
pub fn load_config(
    dir: &Path,
    explicit: Option<&Path>,
    base: GridConfig,
    overrides: &GridOverrides,
) -> Result<GridConfig, ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(dir),
    };
    let overlay = match &path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            Some(read_config_file(path)?)
        }
        None => None,
    };
    resolve_config(base, overlay, overrides)
}

/// Returns a fully-commented stock `ccbm.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# ccbm Configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# ccbm looks for this file next to the input image, or takes one
# explicitly with `ccbm split --config PATH`. Command-line flags
# (--target-size, --grid-size, --tile-size, --spacing) override it.
# Unknown keys will cause an error.

# Side of the intermediate square, in pixels. The input is resized so its
# shorter side matches, then center-cropped to a square of this size.
target_size = 378

# Rows = columns of the output grid. 3 writes 9 tiles.
grid_size = 3

# Side of each output tile, in pixels.
tile_size = 116

# Pixels skipped between neighbouring tiles (the physical gap between keys).
# grid_size * tile_size + (grid_size - 1) * spacing must not exceed
# target_size.
spacing = 15
"##
}
