//! Test utilities for integration tests.
//!
//! Builders for synthetic TIFF, BigTIFF and JPEG byte streams, plus helpers
//! to run them through the decoder registry.

use imgcheck::format::{create_decoders, decode_source, DecoderSettings, FileReport};
use imgcheck::io::MemorySource;

// =============================================================================
// Field Types
// =============================================================================

pub const BYTE: u16 = 1;
pub const ASCII: u16 = 2;
pub const SHORT: u16 = 3;
pub const LONG: u16 = 4;
pub const RATIONAL: u16 = 5;
pub const UNDEFINED: u16 = 7;
pub const LONG8: u16 = 16;

/// Size of one value of `field_type`, or of one half of a rational.
fn element_size(field_type: u16) -> usize {
    match field_type {
        1 | 2 | 6 | 7 => 1,
        3 | 8 => 2,
        4 | 5 | 9 | 10 | 11 | 13 => 4,
        _ => 8,
    }
}

// =============================================================================
// TIFF File Builders
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

/// Builder for creating test TIFF files.
///
/// Directories are laid out one after the other, each followed by its
/// out-of-line field data and its image data, all at even offsets.
pub struct TiffBuilder {
    byte_order: ByteOrderType,
    is_bigtiff: bool,
    ifds: Vec<IfdBuilder>,
    trailing: Vec<u8>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            is_bigtiff: false,
            ifds: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_bigtiff(mut self, is_bigtiff: bool) -> Self {
        self.is_bigtiff = is_bigtiff;
        self
    }

    pub fn add_ifd(mut self, ifd: IfdBuilder) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Bytes appended after everything else.
    pub fn with_trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// Build the TIFF file data.
    pub fn build(self) -> Vec<u8> {
        let w = Writer {
            order: self.byte_order,
        };
        let header_size = if self.is_bigtiff { 16 } else { 8 };
        let (count_size, entry_size, offset_size) = if self.is_bigtiff {
            (8, 20, 8)
        } else {
            (2, 12, 4)
        };

        // Layout pass
        let mut pos = header_size;
        let mut plans = Vec::new();
        for ifd in &self.ifds {
            pos = even(pos);
            let dir_offset = pos;
            let mut entries = ifd.entries.clone();
            if let Some(strip) = &ifd.strip {
                entries.push(Entry::values(273, LONG, vec![0]));
                entries.push(Entry::values(279, LONG, vec![strip.len() as u64]));
            }
            if let Some(jpeg) = &ifd.jpeg {
                entries.push(Entry::values(513, LONG, vec![0]));
                entries.push(Entry::values(514, LONG, vec![jpeg.len() as u64]));
            }
            entries.sort_by_key(|e| e.tag);
            pos += count_size + entries.len() * entry_size + offset_size;

            let mut externals = Vec::new();
            for (i, entry) in entries.iter().enumerate() {
                let len = entry.encoded(w).len();
                if len > offset_size {
                    pos = even(pos);
                    externals.push((i, pos));
                    pos += len;
                }
            }
            let mut blobs = Vec::new();
            for (tag, blob) in [(273u16, &ifd.strip), (513u16, &ifd.jpeg)] {
                if let Some(blob) = blob {
                    pos = even(pos);
                    if let Some(e) = entries.iter_mut().find(|e| e.tag == tag) {
                        e.payload = Payload::Values(vec![pos as u64]);
                    }
                    blobs.push((pos, blob.clone()));
                    pos += blob.len();
                }
            }
            plans.push((dir_offset, entries, externals, blobs));
        }

        // Write pass
        let mut data = vec![0u8; pos];
        data[..2].copy_from_slice(match self.byte_order {
            ByteOrderType::LittleEndian => b"II",
            ByteOrderType::BigEndian => b"MM",
        });
        let first = plans.first().map_or(0, |p| p.0 as u64);
        if self.is_bigtiff {
            put(&mut data, 2, &w.u16(43));
            put(&mut data, 4, &w.u16(8));
            put(&mut data, 8, &w.u64(first));
        } else {
            put(&mut data, 2, &w.u16(42));
            put(&mut data, 4, &w.u32(first as u32));
        }

        for (idx, (dir_offset, entries, externals, blobs)) in plans.iter().enumerate() {
            let mut at = *dir_offset;
            if self.is_bigtiff {
                put(&mut data, at, &w.u64(entries.len() as u64));
            } else {
                put(&mut data, at, &w.u16(entries.len() as u16));
            }
            at += count_size;
            for (i, entry) in entries.iter().enumerate() {
                put(&mut data, at, &w.u16(entry.tag));
                put(&mut data, at + 2, &w.u16(entry.field_type));
                let count_at = at + 4;
                let value_at = if self.is_bigtiff { at + 12 } else { at + 8 };
                if self.is_bigtiff {
                    put(&mut data, count_at, &w.u64(entry.count()));
                } else {
                    put(&mut data, count_at, &w.u32(entry.count() as u32));
                }
                let encoded = entry.encoded(w);
                match (&entry.payload, externals.iter().find(|(e, _)| *e == i)) {
                    (Payload::Inline { value, .. }, _) => {
                        let bytes = if self.is_bigtiff {
                            w.u64(*value)
                        } else {
                            w.u32(*value as u32)
                        };
                        put(&mut data, value_at, &bytes);
                    }
                    (_, Some((_, offset))) => {
                        put(&mut data, *offset, &encoded);
                        let bytes = if self.is_bigtiff {
                            w.u64(*offset as u64)
                        } else {
                            w.u32(*offset as u32)
                        };
                        put(&mut data, value_at, &bytes);
                    }
                    (_, None) => put(&mut data, value_at, &encoded),
                }
                at += entry_size;
            }
            let next = plans.get(idx + 1).map_or(0, |p| p.0 as u64);
            if self.is_bigtiff {
                put(&mut data, at, &w.u64(next));
            } else {
                put(&mut data, at, &w.u32(next as u32));
            }
            for (offset, blob) in blobs {
                put(&mut data, *offset, blob);
            }
        }

        data.extend_from_slice(&self.trailing);
        data
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn even(pos: usize) -> usize {
    pos + pos % 2
}

fn put(data: &mut [u8], at: usize, bytes: &[u8]) {
    data[at..at + bytes.len()].copy_from_slice(bytes);
}

#[derive(Clone, Copy)]
struct Writer {
    order: ByteOrderType,
}

impl Writer {
    fn u16(self, v: u16) -> Vec<u8> {
        match self.order {
            ByteOrderType::LittleEndian => v.to_le_bytes().to_vec(),
            ByteOrderType::BigEndian => v.to_be_bytes().to_vec(),
        }
    }

    fn u32(self, v: u32) -> Vec<u8> {
        match self.order {
            ByteOrderType::LittleEndian => v.to_le_bytes().to_vec(),
            ByteOrderType::BigEndian => v.to_be_bytes().to_vec(),
        }
    }

    fn u64(self, v: u64) -> Vec<u8> {
        match self.order {
            ByteOrderType::LittleEndian => v.to_le_bytes().to_vec(),
            ByteOrderType::BigEndian => v.to_be_bytes().to_vec(),
        }
    }

    fn value(self, size: usize, v: u64) -> Vec<u8> {
        match size {
            1 => vec![v as u8],
            2 => self.u16(v as u16),
            4 => self.u32(v as u32),
            _ => self.u64(v),
        }
    }
}

#[derive(Clone)]
enum Payload {
    /// Numbers encoded in the field type's width; rationals as pairs
    Values(Vec<u64>),
    /// Raw bytes, one per count
    Raw(Vec<u8>),
    /// Count and value field written verbatim
    Inline { count: u64, value: u64 },
}

#[derive(Clone)]
struct Entry {
    tag: u16,
    field_type: u16,
    payload: Payload,
}

impl Entry {
    fn values(tag: u16, field_type: u16, values: Vec<u64>) -> Self {
        Self {
            tag,
            field_type,
            payload: Payload::Values(values),
        }
    }

    fn count(&self) -> u64 {
        match &self.payload {
            Payload::Values(v) if matches!(self.field_type, 5 | 10) => v.len() as u64 / 2,
            Payload::Values(v) => v.len() as u64,
            Payload::Raw(bytes) => bytes.len() as u64,
            Payload::Inline { count, .. } => *count,
        }
    }

    fn encoded(&self, w: Writer) -> Vec<u8> {
        match &self.payload {
            Payload::Values(values) => values
                .iter()
                .flat_map(|&v| w.value(element_size(self.field_type), v))
                .collect(),
            Payload::Raw(bytes) => bytes.clone(),
            Payload::Inline { .. } => Vec::new(),
        }
    }
}

/// Builder for one image file directory.
#[derive(Clone, Default)]
pub struct IfdBuilder {
    entries: Vec<Entry>,
    strip: Option<Vec<u8>>,
    jpeg: Option<Vec<u8>>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uncompressed 8-bit grayscale image in a single strip.
    pub fn gray_strip(width: u32, height: u32) -> Self {
        Self::new()
            .entry(256, LONG, &[width as u64])
            .entry(257, LONG, &[height as u64])
            .entry(258, SHORT, &[8])
            .entry(259, SHORT, &[1])
            .entry(262, SHORT, &[1])
            .entry(277, SHORT, &[1])
            .entry(278, LONG, &[height as u64])
            .with_strip(vec![0x80; (width * height) as usize])
    }

    /// Add a numeric field; rationals take numerator/denominator pairs.
    pub fn entry(mut self, tag: u16, field_type: u16, values: &[u64]) -> Self {
        self.entries.push(Entry::values(tag, field_type, values.to_vec()));
        self
    }

    /// Add a zero-terminated ASCII field.
    pub fn ascii(mut self, tag: u16, text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.entries.push(Entry {
            tag,
            field_type: ASCII,
            payload: Payload::Raw(bytes),
        });
        self
    }

    /// Add a byte-sized field with raw content.
    pub fn bytes(mut self, tag: u16, field_type: u16, bytes: &[u8]) -> Self {
        self.entries.push(Entry {
            tag,
            field_type,
            payload: Payload::Raw(bytes.to_vec()),
        });
        self
    }

    /// Add a field with a verbatim count and value/offset word.
    pub fn raw_entry(mut self, tag: u16, field_type: u16, count: u64, value: u64) -> Self {
        self.entries.push(Entry {
            tag,
            field_type,
            payload: Payload::Inline { count, value },
        });
        self
    }

    /// Drop all fields with `tag`.
    pub fn without(mut self, tag: u16) -> Self {
        self.entries.retain(|e| e.tag != tag);
        if tag == 273 || tag == 279 {
            self.strip = None;
        }
        self
    }

    /// Image data stored as the only strip (tags 273/279).
    pub fn with_strip(mut self, data: Vec<u8>) -> Self {
        self.strip = Some(data);
        self
    }

    /// Embedded JPEG stream (tags 513/514).
    pub fn with_jpeg(mut self, data: Vec<u8>) -> Self {
        self.jpeg = Some(data);
        self
    }
}

/// Classic little-endian grayscale TIFF with one strip.
pub fn create_strip_tiff() -> Vec<u8> {
    TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 4))
        .build()
}

// =============================================================================
// JPEG Builders
// =============================================================================

pub const SOI: [u8; 2] = [0xFF, 0xD8];
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Builder for JPEG marker streams.
pub struct JpegBuilder {
    data: Vec<u8>,
}

impl JpegBuilder {
    /// Stream starting with SOI.
    pub fn new() -> Self {
        Self { data: SOI.to_vec() }
    }

    /// Marker segment with a length field computed from `payload`.
    pub fn segment(mut self, marker: u8, payload: &[u8]) -> Self {
        self.data.extend_from_slice(&[0xFF, marker]);
        self.data
            .extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        self.data.extend_from_slice(payload);
        self
    }

    /// Raw bytes, e.g. entropy-coded data or a standalone marker.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn jfif(self) -> Self {
        self.segment(0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00")
    }

    pub fn comment(self, text: &str) -> Self {
        self.segment(0xFE, text.as_bytes())
    }

    /// Quantization table 0 with 8-bit entries of 1.
    pub fn quantization_table(self) -> Self {
        let mut payload = vec![0x00];
        payload.extend(std::iter::repeat(1u8).take(64));
        self.segment(0xDB, &payload)
    }

    /// DC and AC table 0, each with one 1-bit code for symbol 0.
    pub fn minimal_huffman_tables(self) -> Self {
        let table = |class: u8| {
            let mut payload = vec![class, 1];
            payload.extend(std::iter::repeat(0u8).take(15));
            payload.push(0x00);
            payload
        };
        self.segment(0xC4, &table(0x00)).segment(0xC4, &table(0x10))
    }

    /// Single-component frame with the given start-of-frame marker.
    pub fn frame(self, marker: u8, precision: u8, width: u16, height: u16) -> Self {
        let mut payload = vec![precision];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.extend_from_slice(&[1, 1, 0x11, 0]);
        self.segment(marker, &payload)
    }

    pub fn restart_interval(self, interval: u16) -> Self {
        self.segment(0xDD, &interval.to_be_bytes())
    }

    /// Single-component scan using tables 0.
    pub fn scan(self, start: u8, end: u8, approx: u8) -> Self {
        self.segment(0xDA, &[1, 1, 0x00, start, end, approx])
    }

    pub fn eoi(self) -> Self {
        self.raw(&EOI)
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Grayscale baseline stream whose blocks are all zero.
///
/// With the minimal tables every block codes as the two bits `00`, so one
/// `0x3F` byte (padded with ones) holds exactly one block.
pub fn baseline_jpeg(width: u16, height: u16, restart: Option<u16>, scan_data: &[u8]) -> Vec<u8> {
    let mut builder = JpegBuilder::new()
        .jfif()
        .quantization_table()
        .minimal_huffman_tables()
        .frame(0xC0, 8, width, height);
    if let Some(interval) = restart {
        builder = builder.restart_interval(interval);
    }
    builder.scan(0, 63, 0).raw(scan_data).eoi().build()
}

/// Valid 8x8 baseline stream.
pub fn create_test_jpeg() -> Vec<u8> {
    baseline_jpeg(8, 8, None, &[0x3F])
}

/// Progressive stream; its scan data is skipped, not decoded.
pub fn create_progressive_jpeg() -> Vec<u8> {
    JpegBuilder::new()
        .quantization_table()
        .minimal_huffman_tables()
        .frame(0xC2, 8, 8, 8)
        .scan(0, 0, 0)
        .raw(&[0x12, 0x34, 0xFF, 0x00, 0x56])
        .eoi()
        .build()
}

// =============================================================================
// Decoding Helpers
// =============================================================================

/// Run `data` through the registry with `settings`.
pub fn decode_with(data: &[u8], name: &str, settings: &DecoderSettings) -> FileReport {
    let mut decoders = create_decoders(settings);
    let mut source = MemorySource::new(data.to_vec(), name);
    decode_source(&mut decoders, settings, &mut source)
}

/// Run `data` through the registry with default settings.
pub fn decode(data: &[u8]) -> FileReport {
    decode_with(data, "test", &DecoderSettings::default())
}

/// Check if data starts with TIFF magic bytes.
pub fn is_tiff_magic(data: &[u8]) -> bool {
    data.len() >= 4
        && ((data[0] == b'I' && data[1] == b'I' && data[2] == 42 && data[3] == 0)
            || (data[0] == b'M' && data[1] == b'M' && data[2] == 0 && data[3] == 42))
}
