//! Entropy-coded scan data: extraction, bit reading and sequential decoding.
//!
//! The bytes following an SOS header run until the next marker that is not a
//! restart marker. Inside them, a literal `0xFF` is always stuffed with a
//! `0x00`, and `RST0..RST7` separate restart intervals.
//!
//! For sequential Huffman frames every block is decoded (ITU-T T.81 F.2.2):
//! the DC difference via DECODE / RECEIVE / EXTEND with a per-component
//! predictor, the AC coefficients with run-length and end-of-block handling.
//! Coefficient values are not kept.

use bytes::{Bytes, BytesMut};
use memchr::memchr;
use tracing::trace;

use crate::error::IoError;
use crate::io::Source;
use crate::messages::jpeg as msg;

use super::decoder::JpegFileDescription;
use super::frame::JpegFrame;
use super::huffman::{JpegHuffmanTable, MAX_CODE_LENGTH, TABLE_CLASS_AC, TABLE_CLASS_DC};
use super::markers::is_restart;
use super::scan::JpegScan;

/// Bytes read from the source per step while looking for the end of a scan.
pub const SCAN_READ_CHUNK: usize = 64 * 1024;

// =============================================================================
// Extraction
// =============================================================================

/// Read the entropy-coded data starting at `offset`.
///
/// Stops in front of the first `0xFF` that is followed by neither `0x00` nor
/// a restart marker, or at the end of the source. Fill bytes before the
/// terminating marker are not part of the data.
pub fn read_entropy_coded_data(source: &mut dyn Source, offset: u64) -> Result<Bytes, IoError> {
    let length = source.len();
    let mut data = BytesMut::new();
    let mut position = offset;
    let mut scanned = 0;

    while position < length {
        let chunk = (length - position).min(SCAN_READ_CHUNK as u64) as usize;
        let bytes = source.read_exact_at(position, chunk)?;
        data.extend_from_slice(&bytes);
        position += chunk as u64;

        loop {
            let Some(found) = memchr(0xFF, &data[scanned..]) else {
                scanned = data.len();
                break;
            };
            let at = scanned + found;
            let Some(&next) = data.get(at + 1) else {
                // second marker byte is in the next chunk
                scanned = at;
                break;
            };
            if next != 0x00 && !is_restart(0xFF00 | u16::from(next)) {
                data.truncate(at);
                return Ok(data.freeze());
            }
            scanned = at + 1;
        }
    }
    Ok(data.freeze())
}

// =============================================================================
// BitReader
// =============================================================================

/// Why reading bits stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitError {
    /// Data exhausted or a marker reached
    EndOfData,
    /// No code of up to 16 bits matched
    InvalidCode,
}

/// Restart marker mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartError {
    Unexpected { found: u8, offset: u64, expected: u8 },
    Missing { expected: u8, offset: u64 },
}

/// MSB-first bit reader over entropy-coded bytes.
///
/// Destuffs `FF 00` and refuses to read across any marker; restart markers
/// are only consumed through [`BitReader::restart`].
#[derive(Debug)]
pub struct BitReader {
    data: Bytes,
    /// File offset of `data[0]`
    offset: u64,
    position: usize,
    buffer: u32,
    bits: u8,
}

impl BitReader {
    pub fn new(data: Bytes, offset: u64) -> Self {
        Self {
            data,
            offset,
            position: 0,
            buffer: 0,
            bits: 0,
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        if byte != 0xFF {
            self.position += 1;
            return Some(byte);
        }
        match self.data.get(self.position + 1) {
            Some(0x00) => {
                self.position += 2;
                Some(0xFF)
            }
            _ => None,
        }
    }

    pub fn read_bit(&mut self) -> Result<u16, BitError> {
        if self.bits == 0 {
            self.buffer = u32::from(self.next_byte().ok_or(BitError::EndOfData)?);
            self.bits = 8;
        }
        self.bits -= 1;
        Ok(((self.buffer >> self.bits) & 1) as u16)
    }

    /// RECEIVE: the next `count` bits as an unsigned value.
    pub fn receive(&mut self, count: u8) -> Result<u16, BitError> {
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()?;
        }
        Ok(value)
    }

    /// DECODE: one Huffman-coded symbol.
    pub fn decode(&mut self, table: &JpegHuffmanTable) -> Result<u8, BitError> {
        let mut code = i32::from(self.read_bit()?);
        let mut length = 1;
        while code > table.max_code(length) {
            if length == MAX_CODE_LENGTH {
                return Err(BitError::InvalidCode);
            }
            code = (code << 1) | i32::from(self.read_bit()?);
            length += 1;
        }
        table.symbol(length, code).ok_or(BitError::InvalidCode)
    }

    /// Discard buffered bits and consume restart marker `RST<expected>`.
    pub fn restart(&mut self, expected: u8) -> Result<(), RestartError> {
        self.bits = 0;
        let offset = self.offset + self.position as u64;
        match (self.data.get(self.position), self.data.get(self.position + 1)) {
            (Some(0xFF), Some(&next)) if is_restart(0xFF00 | u16::from(next)) => {
                let found = next - 0xD0;
                if found != expected {
                    return Err(RestartError::Unexpected {
                        found,
                        offset,
                        expected,
                    });
                }
                self.position += 2;
                Ok(())
            }
            _ => Err(RestartError::Missing { expected, offset }),
        }
    }
}

/// EXTEND: sign-extend a `size`-bit magnitude.
pub fn extend(value: u16, size: u8) -> i32 {
    if size == 0 {
        return 0;
    }
    let value = i32::from(value);
    if value < 1 << (size - 1) {
        value - (1 << size) + 1
    } else {
        value
    }
}

// =============================================================================
// Scan decoding
// =============================================================================

struct ComponentPlan<'a> {
    dc: &'a JpegHuffmanTable,
    ac: &'a JpegHuffmanTable,
    /// Blocks per MCU
    blocks: u32,
}

/// Number of MCUs in `scan` and the blocks each component contributes.
fn mcu_layout(frame: &JpegFrame, scan: &JpegScan) -> Option<(u64, Vec<u32>)> {
    let width = u64::from(frame.width);
    let height = u64::from(frame.height);
    if width == 0 || height == 0 {
        return None;
    }
    let h_max = u64::from(frame.max_horizontal_sampling());
    let v_max = u64::from(frame.max_vertical_sampling());

    if let [single] = scan.components.as_slice() {
        // non-interleaved: one block per MCU, over the component's own size
        let comp = frame.find_component(single.id)?;
        let comp_width = (width * u64::from(comp.horizontal_sampling)).div_ceil(h_max);
        let comp_height = (height * u64::from(comp.vertical_sampling)).div_ceil(v_max);
        return Some((comp_width.div_ceil(8) * comp_height.div_ceil(8), vec![1]));
    }

    let mcus = width.div_ceil(8 * h_max) * height.div_ceil(8 * v_max);
    let blocks = scan
        .components
        .iter()
        .map(|sc| {
            frame
                .find_component(sc.id)
                .map(|c| u32::from(c.horizontal_sampling) * u32::from(c.vertical_sampling))
        })
        .collect::<Option<Vec<_>>>()?;
    Some((mcus, blocks))
}

enum BlockError {
    Bits(BitError),
    Overflow,
}

impl From<BitError> for BlockError {
    fn from(e: BitError) -> Self {
        BlockError::Bits(e)
    }
}

fn decode_block(
    reader: &mut BitReader,
    plan: &ComponentPlan<'_>,
    predictor: &mut i32,
) -> Result<(), BlockError> {
    let size = reader.decode(plan.dc)?;
    if size > 16 {
        return Err(BlockError::Bits(BitError::InvalidCode));
    }
    let diff = extend(reader.receive(size)?, size);
    *predictor = predictor.wrapping_add(diff);

    let mut k = 1usize;
    while k < 64 {
        let rs = reader.decode(plan.ac)?;
        let run = usize::from(rs >> 4);
        let size = rs & 0x0F;
        if size == 0 {
            if run == 15 {
                k += 16;
                if k > 64 {
                    return Err(BlockError::Overflow);
                }
                continue;
            }
            break;
        }
        k += run;
        if k > 63 {
            return Err(BlockError::Overflow);
        }
        extend(reader.receive(size)?, size);
        k += 1;
    }
    Ok(())
}

/// Entropy-decode the last scan of the frame over `data`.
///
/// `scan_number` counts scans from 1 and only labels diagnostics.
pub fn decode_sequential_scan(
    desc: &mut JpegFileDescription,
    data: Bytes,
    data_offset: u64,
    scan_number: usize,
) {
    let Some(frame) = desc.frame.as_ref() else {
        return;
    };
    let Some(scan) = frame.scans.last() else {
        return;
    };

    let mut plans = Vec::with_capacity(scan.components.len());
    for sc in &scan.components {
        let dc = desc.huffman_tables[usize::from(TABLE_CLASS_DC)]
            .get(usize::from(sc.dc_table))
            .and_then(Option::as_ref);
        let ac = desc.huffman_tables[usize::from(TABLE_CLASS_AC)]
            .get(usize::from(sc.ac_table))
            .and_then(Option::as_ref);
        match (dc, ac) {
            (Some(dc), Some(ac)) => plans.push((dc, ac)),
            (dc, ac) => {
                if dc.is_none() {
                    desc.diagnostics
                        .error(msg::UNDEFINED_HUFFMAN_TABLE, &[&sc.id, &"DC", &sc.dc_table]);
                }
                if ac.is_none() {
                    desc.diagnostics
                        .error(msg::UNDEFINED_HUFFMAN_TABLE, &[&sc.id, &"AC", &sc.ac_table]);
                }
            }
        }
    }
    if plans.len() != scan.components.len() {
        return;
    }
    let Some((total_mcus, blocks)) = mcu_layout(frame, scan) else {
        return;
    };
    let plans: Vec<ComponentPlan<'_>> = plans
        .into_iter()
        .zip(blocks)
        .map(|((dc, ac), blocks)| ComponentPlan { dc, ac, blocks })
        .collect();

    let restart_interval = u64::from(desc.restart_interval);
    let mut reader = BitReader::new(data, data_offset);
    let mut predictors = vec![0i32; plans.len()];
    let mut expected_restart = 0u8;

    for mcu in 0..total_mcus {
        if restart_interval > 0 && mcu > 0 && mcu % restart_interval == 0 {
            match reader.restart(expected_restart) {
                Ok(()) => {}
                Err(RestartError::Unexpected {
                    found,
                    offset,
                    expected,
                }) => {
                    desc.diagnostics.error(
                        msg::UNEXPECTED_RESTART_MARKER,
                        &[&found, &offset, &expected],
                    );
                    return;
                }
                Err(RestartError::Missing { expected, offset }) => {
                    desc.diagnostics
                        .error(msg::MISSING_RESTART_MARKER, &[&expected, &offset]);
                    return;
                }
            }
            predictors.iter_mut().for_each(|p| *p = 0);
            expected_restart = (expected_restart + 1) % 8;
        }

        for (plan, predictor) in plans.iter().zip(predictors.iter_mut()) {
            for _ in 0..plan.blocks {
                match decode_block(&mut reader, plan, predictor) {
                    Ok(()) => {}
                    Err(BlockError::Bits(BitError::EndOfData)) => {
                        desc.diagnostics.error(
                            msg::PREMATURE_END_OF_SCAN_DATA,
                            &[&scan_number, &mcu, &total_mcus],
                        );
                        return;
                    }
                    Err(BlockError::Bits(BitError::InvalidCode)) => {
                        desc.diagnostics
                            .error(msg::INVALID_HUFFMAN_CODE, &[&mcu, &scan_number]);
                        return;
                    }
                    Err(BlockError::Overflow) => {
                        desc.diagnostics
                            .error(msg::AC_COEFFICIENT_OVERFLOW, &[&mcu, &scan_number]);
                        return;
                    }
                }
            }
        }
    }
    trace!(scan = scan_number, mcus = total_mcus, "decoded scan");
}
