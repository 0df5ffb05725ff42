//! # ccbm
//!
//! Turns one picture into a set of key backgrounds for a multi-key control
//! surface such as a 3×3 creative console keypad.
//!
//! # Architecture: One Image, Four Steps
//!
//! ```text
//! photo.jpg ─ decode ─▶ resize ─▶ crop to square ─▶ slice ─▶ photo_1.png … photo_9.png
//! ```
//!
//! 1. **Resize** so the shorter side (height for landscape, width otherwise)
//!    equals the target size, keeping the aspect ratio.
//! 2. **Crop** the centered `target × target` square.
//! 3. **Slice** the square into a `grid × grid` set of tiles, skipping
//!    `spacing` pixels between neighbours so the picture lines up across the
//!    physical gaps between keys.
//! 4. **Save** each tile as PNG next to the input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | [`GridConfig`](config::GridConfig), presets, `ccbm.toml` loading and validation |
//! | [`imaging`] | Capability traits, their production implementations, and the transform steps |
//! | [`process`] | [`Service`](process::Service): the orchestrator for one image |
//! | [`types`] | Tile coordinates and slice results shared between steps |
//! | [`output`] | CLI output formatting of a finished run |
//!
//! # Design Decisions
//!
//! ## Capabilities, Not Calls
//!
//! The service never touches `std::fs` or a codec directly. It holds a
//! [`FileSystem`](imaging::FileSystem), a [`Decoder`](imaging::Decoder), an
//! [`Encoder`](imaging::Encoder) and a [`Resizer`](imaging::Resizer), so the
//! whole pipeline runs in memory under test, including failure injection on
//! any single tile.
//!
//! ## Geometry Is Data
//!
//! Different keypads need different squares, tile sizes and gaps. All four
//! numbers are runtime values with a validated default (378 / 3 / 116 / 15,
//! where `3 × 116 + 2 × 15 = 378`). A config that cannot fit its tiles in the
//! square is rejected up front instead of producing clipped tiles.
//!
//! ## Transparent Fill Over Panics
//!
//! Crop and slice read through bounds-clamped copies. Any part of a tile that
//! falls outside its source stays transparent, so odd inputs produce odd
//! tiles, never a crash.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
