//! TIFF header parsing.
//!
//! # TIFF Header Structure
//!
//! ## Classic TIFF (8 bytes)
//! ```text
//! Bytes 0-1: Byte order ("II" = little-endian, "MM" = big-endian)
//! Bytes 2-3: Version (42)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! ## BigTIFF (16 bytes)
//! ```text
//! Bytes 0-1: Byte order
//! Bytes 2-3: Version (43)
//! Bytes 4-5: Offset byte size (must be 8)
//! Bytes 6-7: Reserved (must be 0)
//! Bytes 8-15: Offset to first IFD (8 bytes)
//! ```
//!
//! Every step records its failure on the [`Diagnostics`] and returns `None`,
//! which stops the caller.

use bytes::Bytes;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::IoError;
use crate::io::{is_valid_source_offset, ByteOrder, Segment, Source};
use crate::messages::tiff as msg;

// =============================================================================
// Constants
// =============================================================================

/// Signature of little-endian files ("II" for Intel)
pub const SIGNATURE_LITTLE_ENDIAN: [u8; 2] = *b"II";

/// Signature of big-endian files ("MM" for Motorola)
pub const SIGNATURE_BIG_ENDIAN: [u8; 2] = *b"MM";

/// Version number for classic TIFF
pub const VERSION_TIFF: u16 = 42;

/// Version number for BigTIFF
pub const VERSION_BIGTIFF: u16 = 43;

/// Bytes needed to identify the format: signature and version
pub const IDENTIFY_SIZE: usize = 4;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of BigTIFF header in bytes
pub const BIGTIFF_HEADER_SIZE: usize = 16;

/// Required BigTIFF offset byte size
const BIGTIFF_OFFSET_SIZE: u16 = 8;

// =============================================================================
// TiffHeader
// =============================================================================

/// Identification result: byte order and layout of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Raw version number (42 or 43)
    pub version: u16,
}

impl TiffHeader {
    /// Whether this is a BigTIFF file (64-bit offsets)
    #[inline]
    pub const fn is_big(&self) -> bool {
        self.version == VERSION_BIGTIFF
    }

    /// Size of the entry count field at the start of an IFD.
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        if self.is_big() {
            8
        } else {
            2
        }
    }

    /// Size of the next IFD offset field at the end of an IFD.
    #[inline]
    pub const fn ifd_next_offset_size(&self) -> usize {
        if self.is_big() {
            8
        } else {
            4
        }
    }

    /// Size of an IFD entry in bytes.
    #[inline]
    pub const fn ifd_entry_size(&self) -> usize {
        if self.is_big() {
            20
        } else {
            12
        }
    }

    /// Total header size, including the first offset.
    #[inline]
    pub const fn header_size(&self) -> usize {
        if self.is_big() {
            BIGTIFF_HEADER_SIZE
        } else {
            TIFF_HEADER_SIZE
        }
    }
}

// =============================================================================
// Identification
// =============================================================================

/// Read the first four bytes and identify the file.
///
/// Returns `None` if the header cannot be read or is not a TIFF header; the
/// reason is recorded on `diagnostics`.
pub fn identify(source: &mut dyn Source, diagnostics: &mut Diagnostics) -> Option<TiffHeader> {
    let bytes = match source.read_exact_at(0, IDENTIFY_SIZE) {
        Ok(bytes) => bytes,
        Err(e) => {
            diagnostics.error(msg::CANNOT_READ_GLOBAL_HEADER, &[&e]);
            return None;
        }
    };
    identify_bytes(bytes, diagnostics)
}

/// Identify from an already loaded 4-byte header.
pub fn identify_bytes(bytes: Bytes, diagnostics: &mut Diagnostics) -> Option<TiffHeader> {
    let mut header = Segment::new(0, bytes, ByteOrder::default());
    let byte_order = extract_byte_order(&header, diagnostics)?;
    header.set_byte_order(byte_order);
    header.set_index(2);
    let version = extract_version(&mut header, diagnostics)?;
    debug!(
        byte_order = byte_order.name(),
        version, "identified TIFF header"
    );
    Some(TiffHeader {
        byte_order,
        version,
    })
}

/// Byte order from the two signature bytes.
pub fn extract_byte_order(header: &Segment, diagnostics: &mut Diagnostics) -> Option<ByteOrder> {
    if header.equals_at(0, &SIGNATURE_LITTLE_ENDIAN) {
        Some(ByteOrder::LittleEndian)
    } else if header.equals_at(0, &SIGNATURE_BIG_ENDIAN) {
        Some(ByteOrder::BigEndian)
    } else {
        let signature = header
            .data()
            .iter()
            .take(2)
            .map(|b| format!("{:02X}", b))
            .collect::<String>();
        diagnostics.error(msg::INVALID_BYTE_ORDER, &[&format!("0x{}", signature)]);
        None
    }
}

/// Version number at the cursor, read in the header's byte order.
pub fn extract_version(header: &mut Segment, diagnostics: &mut Diagnostics) -> Option<u16> {
    match header.int16() {
        v @ (VERSION_TIFF | VERSION_BIGTIFF) => Some(v),
        v => {
            diagnostics.error(msg::INVALID_VERSION, &[&v]);
            None
        }
    }
}

// =============================================================================
// First offset
// =============================================================================

/// Read and bounds-check the offset of the first directory.
///
/// Malformed headers are recorded and yield `Ok(None)`; only a failed read
/// is an error.
pub fn extract_first_offset(
    source: &mut dyn Source,
    header: &TiffHeader,
    diagnostics: &mut Diagnostics,
) -> Result<Option<u64>, IoError> {
    let rest = header.header_size() - IDENTIFY_SIZE;
    let bytes = source.read_exact_at(IDENTIFY_SIZE as u64, rest)?;
    let mut segment = Segment::new(IDENTIFY_SIZE as u64, bytes, header.byte_order);

    if header.is_big() {
        let offset_size = segment.int16();
        if offset_size != BIGTIFF_OFFSET_SIZE {
            diagnostics.error(msg::INVALID_BIG_TIFF_OFFSET_SIZE, &[&offset_size]);
            return Ok(None);
        }
        let zero = segment.int16();
        if zero != 0 {
            diagnostics.error(msg::INVALID_BIG_TIFF_OFFSET_ZERO, &[&zero]);
            return Ok(None);
        }
    }

    let offset = segment.offset_value(header.is_big());
    if !is_valid_source_offset(offset, source.len()) {
        diagnostics.error(msg::INVALID_FILE_OFFSET, &[&offset, &source.len()]);
        return Ok(None);
    }
    debug!(offset, "first image file directory");
    Ok(Some(offset))
}

// =============================================================================
// Tests
// =============================================================================
