//! Strip and tile layout checks.
//!
//! A directory stores its image data either in strips (offsets, byte counts,
//! rows per strip) or in tiles (width, length, offsets, byte counts). Exactly
//! one of the two sets must be complete. The number of blocks must match the
//! image dimensions and every block must lie inside the file.

use crate::diagnostics::Diagnostics;
use crate::io::is_valid_section;
use crate::messages::tiff as msg;

use super::field::Field;
use super::ifd::ImageFileDirectory;
use super::tags::{TiffTag, PLANAR_CONFIGURATION_SEPARATE};

/// Resolved strip fields of a directory.
struct Strips<'a> {
    offsets: &'a Field,
    byte_counts: &'a Field,
    rows_per_strip: u64,
}

/// Resolved tile fields of a directory.
struct Tiles<'a> {
    width: u64,
    length: u64,
    offsets: &'a Field,
    byte_counts: &'a Field,
}

/// Check the strip or tile layout of `ifd` against a file of `source_len` bytes.
pub fn check_strips_and_tiles(
    ifd: &ImageFileDirectory,
    index: usize,
    source_len: u64,
    diagnostics: &mut Diagnostics,
) {
    let strip_offsets = ifd.find(TiffTag::StripOffsets.as_u16());
    let strip_byte_counts = ifd.find(TiffTag::StripByteCounts.as_u16());
    // A single strip may omit RowsPerStrip: it covers the whole image.
    let rows_per_strip = ifd.value_u64(TiffTag::RowsPerStrip).or_else(|| {
        strip_offsets
            .filter(|f| f.count == 1)
            .and_then(|_| ifd.value_u64(TiffTag::ImageLength))
    });
    let num_strip_fields = [
        strip_offsets.is_some(),
        strip_byte_counts.is_some(),
        rows_per_strip.is_some(),
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    let tile_width = ifd.value_u64(TiffTag::TileWidth);
    let tile_length = ifd.value_u64(TiffTag::TileLength);
    let tile_offsets = ifd.find(TiffTag::TileOffsets.as_u16());
    let tile_byte_counts = ifd.find(TiffTag::TileByteCounts.as_u16());
    let num_tile_fields = [
        tile_width.is_some(),
        tile_length.is_some(),
        tile_offsets.is_some(),
        tile_byte_counts.is_some(),
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    match (num_strip_fields, num_tile_fields) {
        (0, 0) => diagnostics.error(msg::NO_STRIP_OR_TILE_FIELDS, &[&index]),
        (0, 4) => {
            if let (Some(width), Some(length), Some(offsets), Some(byte_counts)) =
                (tile_width, tile_length, tile_offsets, tile_byte_counts)
            {
                let tiles = Tiles {
                    width,
                    length,
                    offsets,
                    byte_counts,
                };
                check_tiles(ifd, index, &tiles, source_len, diagnostics);
            }
        }
        (0, _) => diagnostics.error(msg::SOME_TILE_FIELDS_MISSING, &[&index]),
        (3, 0) => {
            if let (Some(offsets), Some(byte_counts), Some(rows_per_strip)) =
                (strip_offsets, strip_byte_counts, rows_per_strip)
            {
                let strips = Strips {
                    offsets,
                    byte_counts,
                    rows_per_strip,
                };
                check_strips(ifd, index, &strips, source_len, diagnostics);
            }
        }
        (_, 0) => diagnostics.error(msg::ONLY_SOME_STRIP_FIELDS, &[&index]),
        _ => diagnostics.error(msg::STRIP_AND_TILE_FIELDS, &[&index]),
    }
}

/// Samples stored as separate planes multiply the number of blocks.
fn planes(ifd: &ImageFileDirectory) -> u64 {
    if ifd.value_u64(TiffTag::PlanarConfiguration) == Some(PLANAR_CONFIGURATION_SEPARATE) {
        ifd.value_u64(TiffTag::SamplesPerPixel).unwrap_or(1)
    } else {
        1
    }
}

fn check_strips(
    ifd: &ImageFileDirectory,
    index: usize,
    strips: &Strips<'_>,
    source_len: u64,
    diagnostics: &mut Diagnostics,
) {
    let num_offsets = strips.offsets.count;
    let num_byte_counts = strips.byte_counts.count;
    if num_offsets != num_byte_counts {
        diagnostics.error(
            msg::STRIP_OFFSETS_AND_BYTE_COUNTS_DIFFER,
            &[&index, &num_offsets, &num_byte_counts],
        );
    }

    if let Some(height) = ifd.value_u64(TiffTag::ImageLength) {
        if strips.rows_per_strip > 0 {
            let expected = height
                .div_ceil(strips.rows_per_strip)
                .saturating_mul(planes(ifd));
            if num_offsets != expected {
                diagnostics.error(
                    msg::UNEXPECTED_NUMBER_OF_STRIPS,
                    &[&index, &num_offsets, &expected],
                );
            }
        }
    }

    check_image_data_sections(index, strips.offsets, strips.byte_counts, source_len, diagnostics);
}

fn check_tiles(
    ifd: &ImageFileDirectory,
    index: usize,
    tiles: &Tiles<'_>,
    source_len: u64,
    diagnostics: &mut Diagnostics,
) {
    if tiles.width % 16 != 0 {
        diagnostics.error(msg::TILE_WIDTH_NOT_MULTIPLE_OF_16, &[&index, &tiles.width]);
    }
    if tiles.length % 16 != 0 {
        diagnostics.error(msg::TILE_LENGTH_NOT_MULTIPLE_OF_16, &[&index, &tiles.length]);
    }

    let num_offsets = tiles.offsets.count;
    let num_byte_counts = tiles.byte_counts.count;
    if num_offsets != num_byte_counts {
        diagnostics.error(
            msg::TILE_OFFSETS_AND_BYTE_COUNTS_DIFFER,
            &[&index, &num_offsets, &num_byte_counts],
        );
    }

    let width = ifd.value_u64(TiffTag::ImageWidth);
    let length = ifd.value_u64(TiffTag::ImageLength);
    if let (Some(width), Some(length)) = (width, length) {
        if tiles.width > 0 && tiles.length > 0 {
            let expected = width
                .div_ceil(tiles.width)
                .saturating_mul(length.div_ceil(tiles.length))
                .saturating_mul(planes(ifd));
            if num_offsets != expected {
                diagnostics.error(
                    msg::UNEXPECTED_NUMBER_OF_TILES,
                    &[&index, &num_offsets, &expected],
                );
            }
        }
    }

    check_image_data_sections(index, tiles.offsets, tiles.byte_counts, source_len, diagnostics);
}

/// Every (offset, byte count) pair must lie inside the file.
///
/// Reports the first block that does not, then stops.
fn check_image_data_sections(
    index: usize,
    offsets: &Field,
    byte_counts: &Field,
    source_len: u64,
    diagnostics: &mut Diagnostics,
) {
    let offsets = offsets.values_u64();
    let byte_counts = byte_counts.values_u64();
    for (block, (offset, size)) in offsets.iter().zip(byte_counts.iter()).enumerate() {
        if !is_valid_section(*offset, *size, source_len) {
            diagnostics.error(
                msg::IMAGE_DATA_OFFSET_AND_SIZE,
                &[&index, &block, offset, size],
            );
            break;
        }
    }
}
