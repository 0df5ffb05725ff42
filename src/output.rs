//! CLI output formatting for a split run.
//!
//! # Output Format
//!
//! ```text
//! Source: photo.jpg (400x300, JPEG)
//! Resized: 504x378 → cropped 378x378
//! Grid: 3x3, 116px tiles, 15px spacing
//! 001 row 0, col 0 → photo_1.png
//! 002 row 0, col 1 → photo_2.png
//! ...
//! Wrote 9 tiles
//! ```
//!
//! Format functions return `Vec<String>` and do no I/O; `print_*` wrappers
//! write them to stdout.

use crate::config::GridConfig;
use crate::process::SplitReport;
use crate::types::SavedTile;
use image::ImageFormat;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// File name only; tiles always sit next to the source.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::Gif => "GIF",
        ImageFormat::Bmp => "BMP",
        _ => "other",
    }
}

/// One line per tile: index, grid position, output file.
///
/// ```text
/// 005 row 1, col 1 → photo_5.png
/// ```
fn tile_line(tile: &SavedTile) -> String {
    format!(
        "{} row {}, col {} → {}",
        format_index(tile.coord.number),
        tile.coord.row,
        tile.coord.col,
        file_name(&tile.path)
    )
}

/// Describe the grid geometry in one line.
pub fn format_grid(config: &GridConfig) -> String {
    format!(
        "Grid: {g}x{g}, {}px tiles, {}px spacing",
        config.tile_size,
        config.spacing,
        g = config.grid_size
    )
}

/// Format the summary of a successful split.
pub fn format_split_output(report: &SplitReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.tiles.len() + 4);
    let (w, h) = report.original;
    let (rw, rh) = report.resized;
    let target = report.config.target_size;

    lines.push(format!(
        "Source: {} ({}x{}, {})",
        file_name(&report.source),
        w,
        h,
        format_name(report.format)
    ));
    lines.push(format!(
        "Resized: {}x{} → cropped {}x{}",
        rw, rh, target, target
    ));
    lines.push(format_grid(&report.config));
    lines.extend(report.tiles.iter().map(tile_line));

    let noun = if report.tiles.len() == 1 { "tile" } else { "tiles" };
    lines.push(format!("Wrote {} {}", report.tiles.len(), noun));
    lines
}

/// Print split output to stdout.
pub fn print_split_output(report: &SplitReport) {
    for line in format_split_output(report) {
        println!("{}", line);
    }
}
