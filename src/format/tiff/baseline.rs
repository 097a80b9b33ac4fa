//! TIFF baseline profile check.
//!
//! Applied to the first directory only, when enabled in the settings.

use crate::diagnostics::Diagnostics;
use crate::messages::tiff as msg;

use super::ifd::ImageFileDirectory;
use super::schema::FieldSchema;
use super::tags::{compression, photometric, TiffTag};

const ALLOWED_COMPRESSION: [u64; 3] = [
    compression::NONE,
    compression::CCITT_MODIFIED_HUFFMAN_RLE,
    compression::PACKBITS,
];

/// Bits per sample allowed with a photometric interpretation.
fn allowed_bits_per_sample(photometric: u64) -> Option<&'static [u64]> {
    match photometric {
        photometric::WHITE_IS_ZERO | photometric::BLACK_IS_ZERO => Some(&[1, 4, 8]),
        photometric::PALETTE => Some(&[4, 8]),
        photometric::RGB => Some(&[8]),
        _ => None,
    }
}

/// Record why `ifd` is not baseline, or an info event if it is.
pub fn check_baseline(ifd: &ImageFileDirectory, schema: &FieldSchema, diagnostics: &mut Diagnostics) {
    let errors_before = diagnostics.len();

    for field in &ifd.fields {
        if !schema.is_baseline(field.tag) {
            diagnostics.error(msg::BASELINE_TAG_NOT_ALLOWED, &[&field.tag]);
        }
    }

    let compression = ifd
        .value_u64(TiffTag::Compression)
        .unwrap_or(compression::NONE);
    if !ALLOWED_COMPRESSION.contains(&compression) {
        diagnostics.error(msg::BASELINE_COMPRESSION, &[&compression]);
    }

    match ifd.value_u64(TiffTag::PhotometricInterpretation) {
        None => diagnostics.error(msg::BASELINE_PHOTOMETRIC_INTERPRETATION, &[&"none"]),
        Some(value) => match allowed_bits_per_sample(value) {
            None => diagnostics.error(msg::BASELINE_PHOTOMETRIC_INTERPRETATION, &[&value]),
            Some(allowed) => {
                let bits = ifd
                    .find(TiffTag::BitsPerSample.as_u16())
                    .map_or_else(|| vec![1], |f| f.values_u64());
                if let Some(bad) = bits.iter().find(|b| !allowed.contains(b)) {
                    diagnostics.error(msg::BASELINE_BITS_PER_SAMPLE, &[bad, &value]);
                }
            }
        },
    }

    if diagnostics.len() == errors_before {
        diagnostics.info(msg::BASELINE, &[]);
    }
}
