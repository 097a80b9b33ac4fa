//! JPEG marker ids and the marker record.
//!
//! Every JPEG segment starts with a two-byte marker whose top byte is `0xFF`.
//! All markers except the standalone ones (SOI, EOI, RST0..RST7, TEM) are
//! followed by a two-byte big-endian length that includes the length field
//! itself.

use crate::io::Segment;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Top byte shared by all markers
pub const MARKER_MASK: u16 = 0xFF00;

/// Temporary private use in arithmetic coding
pub const TEM: u16 = 0xFF01;

/// Start Of Frame, baseline DCT
pub const SOF0: u16 = 0xFFC0;
/// Start Of Frame, extended sequential DCT
pub const SOF1: u16 = 0xFFC1;
/// Start Of Frame, progressive DCT
pub const SOF2: u16 = 0xFFC2;
/// Start Of Frame, lossless
pub const SOF3: u16 = 0xFFC3;
/// Define Huffman Table
pub const DHT: u16 = 0xFFC4;
pub const SOF5: u16 = 0xFFC5;
pub const SOF6: u16 = 0xFFC6;
pub const SOF7: u16 = 0xFFC7;
/// Reserved for JPEG extensions
pub const JPG: u16 = 0xFFC8;
pub const SOF9: u16 = 0xFFC9;
pub const SOF10: u16 = 0xFFCA;
pub const SOF11: u16 = 0xFFCB;
/// Define Arithmetic Coding conditioning
pub const DAC: u16 = 0xFFCC;
pub const SOF13: u16 = 0xFFCD;
pub const SOF14: u16 = 0xFFCE;
pub const SOF15: u16 = 0xFFCF;

/// First restart marker
pub const RST0: u16 = 0xFFD0;
/// Last restart marker
pub const RST7: u16 = 0xFFD7;

/// Start Of Image
pub const SOI: u16 = 0xFFD8;
/// End Of Image
pub const EOI: u16 = 0xFFD9;
/// Start Of Scan
pub const SOS: u16 = 0xFFDA;
/// Define Quantization Table
pub const DQT: u16 = 0xFFDB;
/// Define Number of Lines
pub const DNL: u16 = 0xFFDC;
/// Define Restart Interval
pub const DRI: u16 = 0xFFDD;

/// Application segment 0 (JFIF)
pub const APP0: u16 = 0xFFE0;
/// Application segment 15
pub const APP15: u16 = 0xFFEF;
/// Comment
pub const COM: u16 = 0xFFFE;

/// Fill byte pair, legal before any marker
pub const FILL: u16 = 0xFFFF;

/// Whether the top byte of `id` is `0xFF`.
pub const fn is_marker(id: u16) -> bool {
    id & MARKER_MASK == MARKER_MASK
}

pub const fn is_restart(id: u16) -> bool {
    id >= RST0 && id <= RST7
}

pub const fn is_start_of_frame(id: u16) -> bool {
    matches!(
        id,
        SOF0 | SOF1 | SOF2 | SOF3 | SOF5 | SOF6 | SOF7 | SOF9 | SOF10 | SOF11 | SOF13 | SOF14
            | SOF15
    )
}

/// Whether a two-byte length follows the marker.
pub const fn has_length(id: u16) -> bool {
    !matches!(id, SOI | EOI | TEM) && !is_restart(id)
}

/// Short mnemonic for diagnostics and logs.
pub fn marker_name(id: u16) -> String {
    let name = match id {
        TEM => "TEM",
        SOF0 => "SOF0",
        SOF1 => "SOF1",
        SOF2 => "SOF2",
        SOF3 => "SOF3",
        DHT => "DHT",
        SOF5 => "SOF5",
        SOF6 => "SOF6",
        SOF7 => "SOF7",
        JPG => "JPG",
        SOF9 => "SOF9",
        SOF10 => "SOF10",
        SOF11 => "SOF11",
        DAC => "DAC",
        SOF13 => "SOF13",
        SOF14 => "SOF14",
        SOF15 => "SOF15",
        SOI => "SOI",
        EOI => "EOI",
        SOS => "SOS",
        DQT => "DQT",
        DNL => "DNL",
        DRI => "DRI",
        COM => "COM",
        _ if is_restart(id) => return format!("RST{}", id - RST0),
        _ if (APP0..=APP15).contains(&id) => return format!("APP{}", id - APP0),
        _ => return format!("0x{:04X}", id),
    };
    name.to_string()
}

// =============================================================================
// Marker
// =============================================================================

/// One marker and its payload.
#[derive(Debug, Clone)]
pub struct Marker {
    pub id: u16,
    /// Declared length including the length field; `None` for standalone markers
    pub length: Option<u16>,
    /// File offset of the `0xFF` byte
    pub offset: u64,
    /// Position in the stream, starting at 1 for SOI
    pub number: u32,
    /// Payload after the length field, big-endian
    pub segment: Segment,
}

impl Marker {
    pub fn name(&self) -> String {
        marker_name(self.id)
    }

    /// Payload size in bytes.
    pub fn payload_len(&self) -> usize {
        self.length.map_or(0, |l| usize::from(l.saturating_sub(2)))
    }
}
