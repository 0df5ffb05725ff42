//! Image processing: the resize → crop → slice transform and the capabilities
//! it runs on.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format guessed from content) |
//! | **Resize** | Lanczos3, one side pinned to the target size |
//! | **Crop** | centered square, `imageops::replace` with transparent fill |
//! | **Slice** | grid of tiles with spacing, row-major |
//! | **Encode** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and offset math (unit testable)
//! - **Backend**: capability traits ([`FileSystem`], [`Decoder`], [`Encoder`], [`Resizer`])
//! - **Rust backend**: production implementations on `std::fs` and `image`
//! - **Operations**: the transform steps combining calculations with pixel work

pub mod backend;
mod calculations;
pub mod operations;
pub mod rust_backend;

pub use backend::{BackendError, Decoder, Encoder, FileSystem, Resizer};
pub use calculations::{
    FixedAxis, center_offset, resize_request, scaled_dimensions, tile_coordinates, tile_origin,
    tile_output_path,
};
pub use operations::{copy_region, crop_to_square, resize_image, split_into_tiles};
pub use rust_backend::{ImageCrateDecoder, LanczosResizer, OsFileSystem, PngTileEncoder};
