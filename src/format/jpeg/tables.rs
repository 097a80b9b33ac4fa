//! DQT, DHT and DRI segment readers.

use crate::io::ByteOrder;
use crate::messages::jpeg as msg;

use super::decoder::JpegFileDescription;
use super::huffman::{HuffmanTableError, JpegHuffmanTable, MAX_CODE_LENGTH};
use super::markers::Marker;

/// Coefficients per 8x8 block
pub const BLOCK_SIZE: usize = 64;
pub const MAX_QUANTIZATION_DESTINATION: u8 = 3;
pub const QUANTIZATION_PRECISION_8_BITS: u8 = 0;
pub const QUANTIZATION_PRECISION_16_BITS: u8 = 1;
pub const RESTART_INTERVAL_LENGTH: u16 = 4;

#[derive(Debug, Clone)]
pub struct JpegQuantizationTable {
    pub id: u8,
    pub precision: u8,
    /// Zig-zag order
    pub values: [u16; BLOCK_SIZE],
}

// =============================================================================
// DQT
// =============================================================================

/// Read every table in a DQT segment.
pub fn read_quantization_tables(marker: &mut Marker, desc: &mut JpegFileDescription) {
    let segment = &mut marker.segment;
    while desc.diagnostics.is_success() && segment.has_bytes(1) {
        let value = segment.int8();
        let precision = value >> 4;
        let id = value & 0x0F;

        if id > MAX_QUANTIZATION_DESTINATION {
            desc.diagnostics.error(
                msg::INVALID_QUANTIZATION_TABLE_DESTINATION,
                &[&id, &MAX_QUANTIZATION_DESTINATION],
            );
        }
        let element_size = match precision {
            QUANTIZATION_PRECISION_8_BITS => 1,
            QUANTIZATION_PRECISION_16_BITS => 2,
            _ => {
                desc.diagnostics
                    .error(msg::INVALID_QUANTIZATION_TABLE_PRECISION, &[&precision]);
                return;
            }
        };
        if !desc.diagnostics.is_success() {
            return;
        }

        let needed = BLOCK_SIZE * element_size;
        let left = segment.num_bytes_left();
        if left < needed {
            desc.diagnostics
                .error(msg::NOT_ENOUGH_DATA_FOR_QUANTIZATION_TABLE, &[&left, &needed]);
            return;
        }
        let data = segment.get_data(needed);
        let mut values = [0u16; BLOCK_SIZE];
        for (value, chunk) in values.iter_mut().zip(data.chunks(element_size)) {
            *value = ByteOrder::BigEndian.decode(chunk) as u16;
        }
        desc.quantization_tables[usize::from(id)] = Some(JpegQuantizationTable {
            id,
            precision,
            values,
        });
    }
}

// =============================================================================
// DHT
// =============================================================================

/// Read every table in a DHT segment and store it by class and destination.
///
/// Class and destination limits depend on the frame; before the frame is
/// known the most permissive limits apply.
pub fn read_huffman_tables(marker: &mut Marker, desc: &mut JpegFileDescription) {
    let (max_class, max_destination): (u8, u8) = match &desc.frame {
        Some(frame) => (
            if frame.is_lossless() { 0 } else { 1 },
            if frame.is_baseline() { 1 } else { 3 },
        ),
        None => (1, 3),
    };

    let segment = &mut marker.segment;
    while desc.diagnostics.is_success() && segment.has_bytes(1) {
        let value = segment.int8();
        let class = value >> 4;
        let id = value & 0x0F;
        if class > max_class {
            desc.diagnostics
                .error(msg::INVALID_HUFFMAN_TABLE_CLASS, &[&class, &max_class]);
        }
        if id > max_destination {
            desc.diagnostics
                .error(msg::INVALID_HUFFMAN_TABLE_DESTINATION, &[&id, &max_destination]);
        }
        if !desc.diagnostics.is_success() {
            return;
        }

        let left = segment.num_bytes_left();
        if left < MAX_CODE_LENGTH {
            desc.diagnostics
                .error(msg::HUFFMAN_TABLE_TOO_SHORT, &[&MAX_CODE_LENGTH, &left]);
            return;
        }
        let mut counts = [0u8; MAX_CODE_LENGTH];
        for count in counts.iter_mut() {
            *count = segment.int8();
        }
        let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
        let left = segment.num_bytes_left();
        if total <= super::huffman::MAX_SYMBOLS && left < total {
            desc.diagnostics
                .error(msg::HUFFMAN_TABLE_TOO_SHORT, &[&total, &left]);
            return;
        }
        let symbols = segment.get_data(total).to_vec();

        match JpegHuffmanTable::build(class, id, counts, symbols) {
            Ok(table) => {
                desc.huffman_tables[usize::from(class)][usize::from(id)] = Some(table);
            }
            Err(HuffmanTableError::TooManyCodes(n)) => {
                desc.diagnostics.error(msg::TOO_MANY_HUFFMAN_CODES, &[&n]);
            }
            Err(HuffmanTableError::InvalidCodeLengths(length)) => {
                desc.diagnostics.error(msg::INVALID_HUFFMAN_CODE_LENGTHS, &[&length]);
            }
        }
    }
}

// =============================================================================
// DRI
// =============================================================================

/// Read the restart interval, in MCUs; zero disables restart markers.
pub fn read_restart_interval(marker: &mut Marker, desc: &mut JpegFileDescription) {
    let length = marker.length.unwrap_or(0);
    if length != RESTART_INTERVAL_LENGTH {
        desc.diagnostics
            .error(msg::INVALID_RESTART_INTERVAL_LENGTH, &[&length]);
        return;
    }
    desc.restart_interval = marker.segment.int16();
}
