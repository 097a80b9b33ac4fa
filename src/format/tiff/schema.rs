//! Per-tag validation schema.
//!
//! Each known tag has a [`FieldDescription`]: allowed field types, value
//! range, value count range, default and whether the tag is mandatory. The
//! schema is built once from a fixed table and shared read-only by every
//! decoder; tags flagged `baseline` form the TIFF baseline profile.

use std::collections::HashMap;

use super::tags::{FieldType, TiffTag};

/// Value count without an upper bound.
pub const UNBOUNDED: u64 = u64::MAX;

const OFFSETS: &[FieldType] = &[FieldType::Short, FieldType::Long, FieldType::Long8];
const SHORT: &[FieldType] = &[FieldType::Short];
const SHORT_LONG: &[FieldType] = &[FieldType::Short, FieldType::Long];
const LONG: &[FieldType] = &[FieldType::Long];
const LONG_LONG8: &[FieldType] = &[FieldType::Long, FieldType::Long8];
const ASCII: &[FieldType] = &[FieldType::Ascii];
const BYTE: &[FieldType] = &[FieldType::Byte];
const BYTES: &[FieldType] = &[FieldType::Byte, FieldType::Undefined];
const UNDEFINED: &[FieldType] = &[FieldType::Undefined];
const RATIONAL: &[FieldType] = &[FieldType::Rational];
const CROP: &[FieldType] = &[FieldType::Short, FieldType::Long, FieldType::Rational];
const IFD_OFFSETS: &[FieldType] = &[
    FieldType::Long,
    FieldType::Ifd,
    FieldType::Long8,
    FieldType::Ifd8,
];

// =============================================================================
// FieldDescription
// =============================================================================

/// Validation rules for one tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescription {
    pub tag: TiffTag,
    pub allowed_types: &'static [FieldType],
    pub min_value: Option<i128>,
    pub max_value: Option<i128>,
    pub min_count: u64,
    pub max_count: u64,
    pub default_value: Option<i128>,
    pub mandatory: bool,
    pub baseline: bool,
}

impl FieldDescription {
    const fn new(tag: TiffTag, allowed_types: &'static [FieldType]) -> Self {
        Self {
            tag,
            allowed_types,
            min_value: None,
            max_value: None,
            min_count: 1,
            max_count: 1,
            default_value: None,
            mandatory: false,
            baseline: false,
        }
    }

    const fn min(mut self, value: i128) -> Self {
        self.min_value = Some(value);
        self
    }

    const fn range(mut self, min: i128, max: i128) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    const fn count(mut self, min: u64, max: u64) -> Self {
        self.min_count = min;
        self.max_count = max;
        self
    }

    const fn default(mut self, value: i128) -> Self {
        self.default_value = Some(value);
        self
    }

    const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    const fn baseline(mut self) -> Self {
        self.baseline = true;
        self
    }

    #[inline]
    pub fn tag_id(&self) -> u16 {
        self.tag.as_u16()
    }

    pub fn name(&self) -> String {
        format!("{:?}", self.tag)
    }

    pub fn allows(&self, field_type: FieldType) -> bool {
        self.allowed_types.contains(&field_type)
    }

    /// Allowed type names joined for messages, e.g. `SHORT|LONG`.
    pub fn allowed_type_names(&self) -> String {
        self.allowed_types
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join("|")
    }
}

// =============================================================================
// Table
// =============================================================================

use TiffTag as T;

const TABLE: &[FieldDescription] = &[
    FieldDescription::new(T::NewSubfileType, LONG).min(0).default(0).baseline(),
    FieldDescription::new(T::SubfileType, SHORT).range(1, 3).baseline(),
    FieldDescription::new(T::ImageWidth, SHORT_LONG).min(1).mandatory().baseline(),
    FieldDescription::new(T::ImageLength, SHORT_LONG).min(1).mandatory().baseline(),
    FieldDescription::new(T::BitsPerSample, SHORT).min(1).count(1, UNBOUNDED).default(1).baseline(),
    FieldDescription::new(T::Compression, SHORT).min(1).default(1).baseline(),
    FieldDescription::new(T::PhotometricInterpretation, SHORT).min(0).mandatory().baseline(),
    FieldDescription::new(T::Threshholding, SHORT).range(1, 3).default(1).baseline(),
    FieldDescription::new(T::CellWidth, SHORT).baseline(),
    FieldDescription::new(T::CellLength, SHORT).baseline(),
    FieldDescription::new(T::FillOrder, SHORT).range(1, 2).default(1).baseline(),
    FieldDescription::new(T::ImageDescription, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::Make, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::Model, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::StripOffsets, OFFSETS).min(8).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::Orientation, SHORT).range(1, 8).default(1).baseline(),
    FieldDescription::new(T::SamplesPerPixel, SHORT).min(1).default(1).baseline(),
    FieldDescription::new(T::RowsPerStrip, OFFSETS).min(1).default(u32::MAX as i128).baseline(),
    FieldDescription::new(T::StripByteCounts, OFFSETS).min(1).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::MinSampleValue, SHORT).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::MaxSampleValue, SHORT).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::XResolution, RATIONAL).baseline(),
    FieldDescription::new(T::YResolution, RATIONAL).baseline(),
    FieldDescription::new(T::PlanarConfiguration, SHORT).range(1, 2).default(1).baseline(),
    FieldDescription::new(T::FreeOffsets, LONG).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::FreeByteCounts, LONG).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::GrayResponseUnit, SHORT).range(1, 5).default(2).baseline(),
    FieldDescription::new(T::GrayResponseCurve, SHORT).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::ResolutionUnit, SHORT).range(1, 3).default(2).baseline(),
    FieldDescription::new(T::Software, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::DateTime, ASCII).count(20, 20).baseline(),
    FieldDescription::new(T::Artist, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::HostComputer, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::Predictor, SHORT).range(1, 3).default(1),
    FieldDescription::new(T::ColorMap, SHORT).count(3, UNBOUNDED).baseline(),
    FieldDescription::new(T::TileWidth, SHORT_LONG).min(16),
    FieldDescription::new(T::TileLength, SHORT_LONG).min(16),
    FieldDescription::new(T::TileOffsets, LONG_LONG8).min(8).count(1, UNBOUNDED),
    FieldDescription::new(T::TileByteCounts, OFFSETS).min(1).count(1, UNBOUNDED),
    FieldDescription::new(T::SubIfds, IFD_OFFSETS).min(8).count(1, UNBOUNDED),
    FieldDescription::new(T::ExtraSamples, SHORT).range(0, 2).count(0, UNBOUNDED).baseline(),
    FieldDescription::new(T::SampleFormat, SHORT).range(1, 4).count(1, UNBOUNDED).default(1),
    FieldDescription::new(T::JpegTables, UNDEFINED).count(1, UNBOUNDED),
    FieldDescription::new(T::JpegInterchangeFormat, LONG).min(8),
    FieldDescription::new(T::JpegInterchangeFormatLength, LONG),
    FieldDescription::new(T::YCbCrSubSampling, SHORT).range(1, 4).count(2, 2),
    FieldDescription::new(T::Xmp, BYTES).count(0, UNBOUNDED),
    FieldDescription::new(T::Copyright, ASCII).count(1, UNBOUNDED).baseline(),
    FieldDescription::new(T::ExifIfd, IFD_OFFSETS).min(8),
    FieldDescription::new(T::GpsIfd, IFD_OFFSETS).min(8),
    FieldDescription::new(T::DateTimeOriginal, ASCII).count(20, 20),
    FieldDescription::new(T::DateTimeDigitized, ASCII).count(20, 20),
    FieldDescription::new(T::DngVersion, BYTE).count(4, 4),
    FieldDescription::new(T::DngBackwardVersion, BYTE).count(4, 4),
    FieldDescription::new(T::UniqueCameraModel, ASCII).count(1, UNBOUNDED),
    FieldDescription::new(T::DefaultCropOrigin, CROP).count(2, 2),
    FieldDescription::new(T::DefaultCropSize, CROP).count(2, 2),
    FieldDescription::new(T::Cr2SliceInformation, SHORT).count(3, 3),
    FieldDescription::new(T::ActiveArea, SHORT_LONG).count(4, 4),
];

// =============================================================================
// FieldSchema
// =============================================================================

/// Tag id to description map, built once.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    by_tag: HashMap<u16, FieldDescription>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema {
    pub fn new() -> Self {
        Self {
            by_tag: TABLE.iter().map(|d| (d.tag_id(), *d)).collect(),
        }
    }

    pub fn get(&self, tag: u16) -> Option<&FieldDescription> {
        self.by_tag.get(&tag)
    }

    /// Whether `tag` belongs to the baseline profile.
    pub fn is_baseline(&self, tag: u16) -> bool {
        self.get(tag).is_some_and(|d| d.baseline)
    }

    /// Descriptions of all mandatory tags, in tag order.
    pub fn mandatory(&self) -> Vec<&FieldDescription> {
        let mut result: Vec<_> = self.by_tag.values().filter(|d| d.mandatory).collect();
        result.sort_by_key(|d| d.tag_id());
        result
    }

    /// Default value of `tag`, if the schema defines one.
    pub fn default_value(&self, tag: u16) -> Option<i128> {
        self.get(tag).and_then(|d| d.default_value)
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}
