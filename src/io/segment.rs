//! Byte-order aware cursor over a loaded region of a source.
//!
//! Both format decoders read everything through [`Segment`]: the TIFF walker
//! for headers, directory entries and field values, the JPEG decoder for
//! marker payloads and entropy-coded scan data.
//!
//! Readers never panic. A read that runs past the end of the buffer yields
//! zero bytes for the missing part and leaves the cursor at the end; callers
//! are expected to confirm availability with [`Segment::has_bytes`] first.

use bytes::{Bytes, BytesMut};

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) governing every multi-byte read of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola), also the JPEG byte order
    #[default]
    BigEndian,
}

impl ByteOrder {
    /// Decode an unsigned integer from up to 16 bytes in this order.
    pub fn decode(self, bytes: &[u8]) -> u128 {
        let fold = |acc: u128, b: &u8| (acc << 8) | u128::from(*b);
        match self {
            ByteOrder::BigEndian => bytes.iter().fold(0, fold),
            ByteOrder::LittleEndian => bytes.iter().rev().fold(0, fold),
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "little-endian",
            ByteOrder::BigEndian => "big-endian",
        }
    }
}

// =============================================================================
// Segment
// =============================================================================

/// Largest width accepted by [`Segment::big_int`].
pub const MAX_BIG_INT_BYTES: usize = 16;

/// A positioned view over bytes read from a source.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    /// Source offset of the first byte in `data`
    offset: u64,
    data: Bytes,
    index: usize,
    byte_order: ByteOrder,
}

impl Segment {
    /// Create a segment over `data`, which was read from `offset` in its source.
    pub fn new(offset: u64, data: Bytes, byte_order: ByteOrder) -> Self {
        Self {
            offset,
            data,
            index: 0,
            byte_order,
        }
    }

    /// Source offset of the first byte of this segment.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Source offset of the cursor.
    #[inline]
    pub fn position(&self) -> u64 {
        self.offset + self.index as u64
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor; values past the end are clamped to the end.
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.data.len());
    }

    /// Advance the cursor without reading.
    pub fn skip(&mut self, num_bytes: usize) {
        self.set_index(self.index.saturating_add(num_bytes));
    }

    /// Move the cursor back, stopping at the start.
    pub fn rewind(&mut self, num_bytes: usize) {
        self.index = self.index.saturating_sub(num_bytes);
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Number of bytes between the cursor and the end of the buffer.
    #[inline]
    pub fn num_bytes_left(&self) -> usize {
        self.data.len() - self.index
    }

    /// Whether at least `num_bytes` can still be read.
    #[inline]
    pub fn has_bytes(&self, num_bytes: usize) -> bool {
        self.num_bytes_left() >= num_bytes
    }

    /// The whole underlying buffer.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Grow the buffer by appending bytes read directly after it.
    pub fn append(&mut self, more: &[u8]) {
        let mut buf = BytesMut::with_capacity(self.data.len() + more.len());
        buf.extend_from_slice(&self.data);
        buf.extend_from_slice(more);
        self.data = buf.freeze();
    }

    // -------------------------------------------------------------------------
    // Integer reads
    // -------------------------------------------------------------------------

    fn take(&mut self, num_bytes: usize) -> &[u8] {
        let start = self.index;
        let end = start.saturating_add(num_bytes).min(self.data.len());
        self.index = end;
        &self.data[start..end]
    }

    fn read_uint(&mut self, width: usize) -> u128 {
        let order = self.byte_order;
        let bytes = self.take(width);
        if bytes.len() == width {
            order.decode(bytes)
        } else {
            0
        }
    }

    /// Read an unsigned 8-bit value.
    pub fn int8(&mut self) -> u8 {
        self.read_uint(1) as u8
    }

    /// Read an unsigned 16-bit value.
    pub fn int16(&mut self) -> u16 {
        self.read_uint(2) as u16
    }

    /// Read an unsigned 32-bit value.
    pub fn int32(&mut self) -> u32 {
        self.read_uint(4) as u32
    }

    /// Read an unsigned 64-bit value.
    pub fn int64(&mut self) -> u64 {
        self.read_uint(8) as u64
    }

    /// Read an unsigned integer of `num_bytes` width without truncation.
    ///
    /// Returns `None` for widths above [`MAX_BIG_INT_BYTES`]; the cursor is
    /// left untouched in that case.
    pub fn big_int(&mut self, num_bytes: usize) -> Option<u128> {
        if num_bytes > MAX_BIG_INT_BYTES {
            return None;
        }
        Some(self.read_uint(num_bytes))
    }

    /// Read an offset-sized value: 4 bytes for TIFF, 8 bytes for BigTIFF.
    pub fn offset_value(&mut self, is_big: bool) -> u64 {
        if is_big {
            self.int64()
        } else {
            u64::from(self.int32())
        }
    }

    // -------------------------------------------------------------------------
    // Raw data
    // -------------------------------------------------------------------------

    /// Compare `pattern` against the buffer at absolute buffer index `at`.
    pub fn equals_at(&self, at: usize, pattern: &[u8]) -> bool {
        at.checked_add(pattern.len())
            .and_then(|end| self.data.get(at..end))
            .is_some_and(|window| window == pattern)
    }

    /// Return the next `num_bytes` bytes and advance past them.
    pub fn get_data(&mut self, num_bytes: usize) -> Bytes {
        let start = self.index;
        let end = start.saturating_add(num_bytes).min(self.data.len());
        self.index = end;
        self.data.slice(start..end)
    }
}

// =============================================================================
// Tests
// =============================================================================
