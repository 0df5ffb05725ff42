//! The three transform steps: resize, crop to square, split into tiles.
//!
//! These functions combine calculations with pixel work. None of them can
//! fail: regions that fall outside the source are left transparent.

use super::backend::Resizer;
use super::calculations::{center_offset, resize_request, tile_coordinates, tile_origin};
use crate::config::GridConfig;
use crate::types::ProcessingResult;
use image::imageops;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Resize so one side equals `target` and the other keeps the aspect ratio.
///
/// Landscape images are pinned on height, everything else on width.
pub fn resize_image(image: &DynamicImage, target: u32, resizer: &impl Resizer) -> DynamicImage {
    let (axis, (width, height)) = resize_request((image.width(), image.height()), target);
    debug!(?axis, width, height, "resize request");
    resizer.resize(width, height, image)
}

/// Copy a `width × height` window whose top-left corner sits at
/// `(x, y)` in `source` into a fresh buffer.
///
/// Pixels of the window outside `source` stay zero (transparent black).
pub fn copy_region(source: &RgbaImage, x: i64, y: i64, width: u32, height: u32) -> RgbaImage {
    let mut region = RgbaImage::new(width, height);
    imageops::replace(&mut region, source, -x, -y);
    region
}

/// Cut the centered `target × target` square out of `image`.
pub fn crop_to_square(image: &DynamicImage, target: u32) -> RgbaImage {
    let (start_x, start_y) = center_offset((image.width(), image.height()), target);
    debug!(start_x, start_y, target, "crop to square");
    copy_region(&image.to_rgba8(), start_x, start_y, target, target)
}

/// Split the square into `grid_size²` tiles, row by row.
///
/// Tiles are independent copies; the n-th tile in the result has
/// `number == n + 1`.
pub fn split_into_tiles(square: &RgbaImage, config: &GridConfig) -> ProcessingResult {
    let coords = tile_coordinates(config.grid_size);
    let tiles = coords
        .iter()
        .map(|coord| {
            let (x, y) = tile_origin(coord.row, coord.col, config);
            copy_region(square, x, y, config.tile_size, config.tile_size)
        })
        .collect();
    ProcessingResult { tiles, coords }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::RecordingResizer;
    use crate::imaging::rust_backend::LanczosResizer;
    use crate::test_helpers::{gradient_image, quadrant_image};
    use image::Rgba;

    const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

    // =========================================================================
    // resize_image tests
    // =========================================================================

    #[test]
    fn resize_landscape_fixes_height() {
        let resizer = RecordingResizer::new();
        let out = resize_image(&DynamicImage::new_rgba8(400, 300), 378, &resizer);
        assert_eq!(resizer.requests(), vec![(0, 378)]);
        assert_eq!(out.height(), 378);
    }

    #[test]
    fn resize_portrait_fixes_width() {
        let resizer = RecordingResizer::new();
        let out = resize_image(&DynamicImage::new_rgba8(300, 400), 378, &resizer);
        assert_eq!(resizer.requests(), vec![(378, 0)]);
        assert_eq!(out.width(), 378);
    }

    #[test]
    fn resize_square_takes_width_branch() {
        let resizer = RecordingResizer::new();
        let out = resize_image(&DynamicImage::new_rgba8(640, 640), 200, &resizer);
        assert_eq!(resizer.requests(), vec![(200, 0)]);
        assert_eq!((out.width(), out.height()), (200, 200));
    }

    #[test]
    fn resize_axis_rule_holds_with_real_resampler() {
        for (w, h) in [(401, 300), (300, 401), (97, 97), (600, 20), (20, 600)] {
            let out = resize_image(&gradient_image(w, h), 120, &LanczosResizer);
            if w > h {
                assert_eq!(out.height(), 120, "{w}x{h}");
            } else {
                assert_eq!(out.width(), 120, "{w}x{h}");
            }
        }
    }

    // =========================================================================
    // copy_region tests
    // =========================================================================

    #[test]
    fn copy_region_inside_bounds_copies_pixels() {
        let src = gradient_image(10, 10).to_rgba8();
        let region = copy_region(&src, 2, 3, 4, 4);
        assert_eq!(region.dimensions(), (4, 4));
        assert_eq!(region.get_pixel(0, 0), src.get_pixel(2, 3));
        assert_eq!(region.get_pixel(3, 3), src.get_pixel(5, 6));
    }

    #[test]
    fn copy_region_negative_offset_pads_top_left() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let region = copy_region(&src, -2, -1, 4, 4);
        assert_eq!(*region.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*region.get_pixel(1, 3), TRANSPARENT);
        assert_eq!(*region.get_pixel(2, 0), TRANSPARENT);
        assert_eq!(*region.get_pixel(2, 1), Rgba([9, 9, 9, 255]));
        assert_eq!(*region.get_pixel(3, 3), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn copy_region_entirely_outside_is_transparent() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        for (x, y) in [(10, 0), (0, 10), (-10, -10)] {
            let region = copy_region(&src, x, y, 3, 3);
            assert!(region.pixels().all(|p| *p == TRANSPARENT), "({x}, {y})");
        }
    }

    #[test]
    fn copy_region_is_independent_of_source() {
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let region = copy_region(&src, 0, 0, 4, 4);
        src.put_pixel(0, 0, Rgba([200, 200, 200, 255]));
        assert_eq!(*region.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    // =========================================================================
    // crop_to_square tests
    // =========================================================================

    #[test]
    fn crop_takes_center_of_landscape() {
        let img = gradient_image(504, 378);
        let square = crop_to_square(&img, 378);
        assert_eq!(square.dimensions(), (378, 378));
        // start_x = 63
        let src = img.to_rgba8();
        assert_eq!(square.get_pixel(0, 0), src.get_pixel(63, 0));
        assert_eq!(square.get_pixel(377, 377), src.get_pixel(440, 377));
    }

    #[test]
    fn crop_takes_center_of_portrait() {
        let img = gradient_image(100, 131);
        let square = crop_to_square(&img, 100);
        // start_y = 31 / 2 = 15
        let src = img.to_rgba8();
        assert_eq!(square.get_pixel(10, 0), src.get_pixel(10, 15));
    }

    #[test]
    fn crop_undersized_image_zero_fills() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            90,
            100,
            Rgba([50, 60, 70, 255]),
        ));
        let square = crop_to_square(&img, 100);
        assert_eq!(square.dimensions(), (100, 100));
        // start_x = -5: columns 0..5 and 95..100 are uncovered
        assert_eq!(*square.get_pixel(0, 50), TRANSPARENT);
        assert_eq!(*square.get_pixel(4, 50), TRANSPARENT);
        assert_eq!(*square.get_pixel(5, 50), Rgba([50, 60, 70, 255]));
        assert_eq!(*square.get_pixel(94, 50), Rgba([50, 60, 70, 255]));
        assert_eq!(*square.get_pixel(95, 50), TRANSPARENT);
    }

    #[test]
    fn crop_tiny_image_to_large_target() {
        let img = DynamicImage::new_rgb8(3, 3);
        let square = crop_to_square(&img, 64);
        assert_eq!(square.dimensions(), (64, 64));
    }

    // =========================================================================
    // split_into_tiles tests
    // =========================================================================

    #[test]
    fn split_default_grid_counts_and_sizes() {
        let config = GridConfig::default();
        let square = gradient_image(378, 378).to_rgba8();
        let result = split_into_tiles(&square, &config);

        assert_eq!(result.len(), 9);
        assert_eq!(result.coords.len(), 9);
        for (tile, coord) in result.iter() {
            assert_eq!(tile.dimensions(), (116, 116));
            assert_eq!(coord.number - 1, coord.row * 3 + coord.col);
        }
        let numbers: Vec<u32> = result.coords.iter().map(|c| c.number).collect();
        assert_eq!(numbers, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn split_skips_spacing() {
        let config = GridConfig::default();
        let square = gradient_image(378, 378).to_rgba8();
        let result = split_into_tiles(&square, &config);

        // Tile #5 is (row 1, col 1), origin (131, 131)
        let center = &result.tiles[4];
        assert_eq!(result.coords[4].row, 1);
        assert_eq!(result.coords[4].col, 1);
        assert_eq!(center.get_pixel(0, 0), square.get_pixel(131, 131));
        assert_eq!(center.get_pixel(115, 115), square.get_pixel(246, 246));
    }

    #[test]
    fn split_two_by_two_picks_quadrants() {
        // 200px square, 2x2 tiles of 90px with 10px gap; each quadrant a distinct color
        let config = GridConfig::new(200, 2, 90, 10);
        let square = quadrant_image(200);
        let result = split_into_tiles(&square, &config);

        assert_eq!(result.len(), 4);
        for (tile, coord) in result.iter() {
            let expected = *square.get_pixel(coord.col * 100 + 45, coord.row * 100 + 45);
            assert!(
                tile.pixels().all(|p| *p == expected),
                "tile {} is not uniform",
                coord.number
            );
        }
        assert_ne!(result.tiles[0], result.tiles[3]);
    }

    #[test]
    fn split_overrunning_grid_zero_fills_last_row_and_col() {
        // 3*40 + 2*10 = 140 > 120
        let config = GridConfig::new(120, 3, 40, 10);
        let square = RgbaImage::from_pixel(120, 120, Rgba([1, 1, 1, 255]));
        let result = split_into_tiles(&square, &config);

        let last = &result.tiles[8];
        // origin (100, 100): only 20x20 is covered
        assert_eq!(*last.get_pixel(19, 19), Rgba([1, 1, 1, 255]));
        assert_eq!(*last.get_pixel(20, 0), TRANSPARENT);
        assert_eq!(*last.get_pixel(0, 20), TRANSPARENT);
        assert_eq!(*last.get_pixel(39, 39), TRANSPARENT);
    }

    #[test]
    fn split_single_tile_ignores_huge_spacing() {
        let config = GridConfig::new(100, 1, 80, u32::MAX);
        assert!(config.validate().is_ok());
        let square = gradient_image(100, 100).to_rgba8();
        let result = split_into_tiles(&square, &config);

        assert_eq!(result.len(), 1);
        assert_eq!(result.tiles[0].dimensions(), (80, 80));
        assert_eq!(result.tiles[0].get_pixel(79, 79), square.get_pixel(79, 79));
    }

    #[test]
    fn split_tiles_do_not_alias() {
        let config = GridConfig::new(20, 2, 10, 0);
        let square = RgbaImage::from_pixel(20, 20, Rgba([5, 5, 5, 255]));
        let mut result = split_into_tiles(&square, &config);
        result.tiles[0].put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        assert_eq!(*result.tiles[1].get_pixel(0, 0), Rgba([5, 5, 5, 255]));
        assert_eq!(*square.get_pixel(0, 0), Rgba([5, 5, 5, 255]));
    }
}
