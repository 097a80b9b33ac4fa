//! Directory entry decoding.
//!
//! A directory entry is 12 bytes (TIFF) or 20 bytes (BigTIFF):
//!
//! ```text
//! tag id      2 bytes
//! type id     2 bytes
//! count       4 bytes (TIFF) / 8 bytes (BigTIFF)
//! value area  4 bytes (TIFF) / 8 bytes (BigTIFF)
//! ```
//!
//! Values whose total size fits in the value area are stored inline.
//! Otherwise the value area holds the offset of the data, which is
//! bounds-checked against the source and loaded in one read.
//!
//! Out-of-line data is charged at its decoded size: the raw bytes plus one
//! [`Value`] per element. A single field may not exceed
//! [`MAX_FIELD_DATA_SIZE`], and all fields of one file share a
//! [`FieldBudget`], so entries pointing at the same large window cannot
//! multiply memory use.

use std::mem;

use bytes::Bytes;
use tracing::trace;

use crate::diagnostics::Diagnostics;
use crate::error::IoError;
use crate::io::{ByteOrder, Segment, Source};
use crate::messages::tiff as msg;

use super::tags::{tag_name, FieldType};

/// Largest decoded size of one out-of-line field.
pub const MAX_FIELD_DATA_SIZE: u64 = 16 * 1024 * 1024;

/// Decoded size all out-of-line fields of one file may use together.
pub const MAX_TOTAL_FIELD_DATA_SIZE: u64 = 64 * 1024 * 1024;

/// Memory charged for `count` elements of `field_type` once decoded.
pub fn decoded_size(field_type: FieldType, count: u64) -> Option<u64> {
    let per_value = field_type.size_in_bytes() + mem::size_of::<Value>();
    count.checked_mul(per_value as u64)
}

// =============================================================================
// Value
// =============================================================================

/// One decoded field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Any integer type, rationals reduced to their quotient
    Integer(i128),
    /// FLOAT or DOUBLE
    Real(f64),
    /// ASCII character
    Char(u8),
}

impl Value {
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Value::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Non-negative integer value that fits a u64.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(|v| u64::try_from(v).ok())
    }
}

// =============================================================================
// Field
// =============================================================================

/// A decoded directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub tag: u16,
    /// Raw type id as stored in the file
    pub type_id: u16,
    /// `None` when the type id is unknown
    pub field_type: Option<FieldType>,
    /// Declared number of values
    pub count: u64,
    /// Offset of the data when not stored inline
    pub value_offset: Option<u64>,
    /// Loaded value bytes; empty if they could not be loaded
    pub raw: Bytes,
    pub values: Vec<Value>,
}

impl Field {
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.value_offset.is_none()
    }

    /// First value as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.values.first().and_then(Value::as_u64)
    }

    /// All values that are non-negative integers.
    pub fn values_u64(&self) -> Vec<u64> {
        self.values.iter().filter_map(Value::as_u64).collect()
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Concatenated characters up to the first zero byte.
    pub fn as_string(&self) -> String {
        self.values
            .iter()
            .filter_map(|v| match v {
                Value::Char(c) => Some(*c),
                _ => None,
            })
            .take_while(|&c| c != 0)
            .map(char::from)
            .collect()
    }

    pub fn name(&self) -> String {
        tag_name(self.tag)
    }
}

// =============================================================================
// FieldBudget
// =============================================================================

/// Decoded bytes still available to the out-of-line fields of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBudget {
    limit: u64,
    remaining: u64,
}

impl FieldBudget {
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Reserve `size` bytes; `false` leaves the budget untouched.
    pub fn take(&mut self, size: u64) -> bool {
        match self.remaining.checked_sub(size) {
            Some(rest) => {
                self.remaining = rest;
                true
            }
            None => false,
        }
    }
}

impl Default for FieldBudget {
    fn default() -> Self {
        Self::new(MAX_TOTAL_FIELD_DATA_SIZE)
    }
}

// =============================================================================
// FieldReader
// =============================================================================

/// Turns raw entries into [`Field`]s, loading out-of-line data.
pub struct FieldReader<'a> {
    source: &'a mut dyn Source,
    budget: &'a mut FieldBudget,
    byte_order: ByteOrder,
    is_big: bool,
}

impl<'a> FieldReader<'a> {
    pub fn new(
        source: &'a mut dyn Source,
        budget: &'a mut FieldBudget,
        byte_order: ByteOrder,
        is_big: bool,
    ) -> Self {
        Self {
            source,
            budget,
            byte_order,
            is_big,
        }
    }

    /// Size of one directory entry.
    #[inline]
    pub const fn entry_size(is_big: bool) -> usize {
        if is_big {
            20
        } else {
            12
        }
    }

    /// Decode the entry at the cursor of `entry`, advancing past it.
    ///
    /// Malformed content is recorded on `diagnostics`; only a failed read
    /// from the source is returned as an error.
    pub fn read_field(
        &mut self,
        entry: &mut Segment,
        diagnostics: &mut Diagnostics,
    ) -> Result<Field, IoError> {
        let tag = entry.int16();
        let type_id = entry.int16();
        let count = entry.offset_value(self.is_big);
        let inline_size = if self.is_big { 8 } else { 4 };
        let value_area = entry.get_data(inline_size);

        let mut field = Field {
            tag,
            type_id,
            field_type: FieldType::from_u16(type_id),
            count,
            value_offset: None,
            raw: Bytes::new(),
            values: Vec::new(),
        };

        let Some(field_type) = field.field_type else {
            diagnostics.error(msg::UNKNOWN_FIELD_TYPE, &[&tag, &type_id]);
            field.raw = value_area;
            return Ok(field);
        };

        if field_type.fits_inline(count, self.is_big) {
            let size = field_type.size_in_bytes() * count as usize;
            field.raw = value_area.slice(..size.min(value_area.len()));
        } else {
            let offset = self.byte_order.decode(&value_area) as u64;
            field.value_offset = Some(offset);
            match self.load(tag, field_type, count, offset, diagnostics)? {
                Some(raw) => field.raw = raw,
                None => return Ok(field),
            }
        }

        field.values = decode_values(&field, field_type, self.byte_order, diagnostics);
        trace!(
            tag,
            field_type = field_type.name(),
            count,
            inline = field.is_inline(),
            "decoded field"
        );
        Ok(field)
    }

    fn load(
        &mut self,
        tag: u16,
        field_type: FieldType,
        count: u64,
        offset: u64,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Bytes>, IoError> {
        if offset % 2 == 1 {
            diagnostics.warning(msg::ODD_FIELD_OFFSET, &[&tag, &offset]);
        }
        let size = (field_type.size_in_bytes() as u64).checked_mul(count);
        let Some(size) = size.filter(|&s| self.source.is_valid_section(offset, s)) else {
            let shown = size.map_or_else(|| "more than 2^64".to_string(), |s| s.to_string());
            diagnostics.error(
                msg::INVALID_FIELD_OFFSET_AND_SIZE,
                &[&tag, &offset, &shown, &self.source.len()],
            );
            return Ok(None);
        };
        let decoded = decoded_size(field_type, count).unwrap_or(u64::MAX);
        if decoded > MAX_FIELD_DATA_SIZE {
            diagnostics.error(msg::FIELD_DATA_TOO_LARGE, &[&tag, &decoded, &MAX_FIELD_DATA_SIZE]);
            return Ok(None);
        }
        if !self.budget.take(decoded) {
            diagnostics.error(
                msg::FIELD_DATA_BUDGET_EXHAUSTED,
                &[&tag, &decoded, &self.budget.remaining(), &self.budget.limit()],
            );
            return Ok(None);
        }
        self.source.read_exact_at(offset, size as usize).map(Some)
    }
}

/// Convert raw bytes to typed values per `field_type`.
fn decode_values(
    field: &Field,
    field_type: FieldType,
    byte_order: ByteOrder,
    diagnostics: &mut Diagnostics,
) -> Vec<Value> {
    let mut data = Segment::new(0, field.raw.clone(), byte_order);
    let count = field.raw.len() / field_type.size_in_bytes();
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let value = match field_type {
            FieldType::Byte | FieldType::Undefined => Value::Integer(data.int8().into()),
            FieldType::Ascii => Value::Char(data.int8()),
            FieldType::Short => Value::Integer(data.int16().into()),
            FieldType::Long | FieldType::Ifd => Value::Integer(data.int32().into()),
            FieldType::Long8 | FieldType::Ifd8 => Value::Integer(data.int64().into()),
            FieldType::SByte => Value::Integer((data.int8() as i8).into()),
            FieldType::SShort => Value::Integer((data.int16() as i16).into()),
            FieldType::SLong => Value::Integer((data.int32() as i32).into()),
            FieldType::SLong8 => Value::Integer((data.int64() as i64).into()),
            FieldType::Float => Value::Real(f32::from_bits(data.int32()).into()),
            FieldType::Double => Value::Real(f64::from_bits(data.int64())),
            FieldType::Rational => {
                let numerator = i128::from(data.int32());
                let denominator = i128::from(data.int32());
                Value::Integer(quotient(field.tag, numerator, denominator, diagnostics))
            }
            FieldType::SRational => {
                let numerator = i128::from(data.int32() as i32);
                let denominator = i128::from(data.int32() as i32);
                Value::Integer(quotient(field.tag, numerator, denominator, diagnostics))
            }
        };
        values.push(value);
    }
    values
}

/// Integer quotient of a rational; `0/0` is the TIFF "unknown" value.
fn quotient(tag: u16, numerator: i128, denominator: i128, diagnostics: &mut Diagnostics) -> i128 {
    if denominator == 0 {
        if numerator != 0 {
            diagnostics.error(msg::DENOMINATOR_ZERO, &[&tag, &numerator]);
        }
        0
    } else {
        numerator / denominator
    }
}
