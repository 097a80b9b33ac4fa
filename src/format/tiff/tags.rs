//! TIFF tag and field type definitions.
//!
//! This module defines the vocabulary for TIFF parsing:
//! - Field types that determine how values are encoded
//! - Tag IDs that identify metadata fields
//! - Well-known values of the compression and photometric fields
//!
//! The definitions cover TIFF6, BigTIFF and the DNG/CR2 extension tags.

use std::fmt;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
///
/// Each field type has a fixed size in bytes, which decides whether a value
/// fits inline in a directory entry and how arrays are split into elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,
    /// 8-bit character, strings are zero-terminated
    Ascii = 2,
    /// Unsigned 16-bit integer
    Short = 3,
    /// Unsigned 32-bit integer
    Long = 4,
    /// Two Longs: numerator and denominator
    Rational = 5,
    /// Signed 8-bit integer
    SByte = 6,
    /// Opaque byte
    Undefined = 7,
    /// Signed 16-bit integer
    SShort = 8,
    /// Signed 32-bit integer
    SLong = 9,
    /// Two SLongs: numerator and denominator
    SRational = 10,
    /// IEEE single precision
    Float = 11,
    /// IEEE double precision
    Double = 12,
    /// 32-bit offset of a sub-directory
    Ifd = 13,
    /// Unsigned 64-bit integer (BigTIFF)
    Long8 = 16,
    /// Signed 64-bit integer (BigTIFF)
    SLong8 = 17,
    /// 64-bit offset of a sub-directory (BigTIFF)
    Ifd8 = 18,
}

impl FieldType {
    /// All field types, in id order.
    pub const ALL: [FieldType; 16] = [
        FieldType::Byte,
        FieldType::Ascii,
        FieldType::Short,
        FieldType::Long,
        FieldType::Rational,
        FieldType::SByte,
        FieldType::Undefined,
        FieldType::SShort,
        FieldType::SLong,
        FieldType::SRational,
        FieldType::Float,
        FieldType::Double,
        FieldType::Ifd,
        FieldType::Long8,
        FieldType::SLong8,
        FieldType::Ifd8,
    ];

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => 4,
            FieldType::Rational
            | FieldType::SRational
            | FieldType::Double
            | FieldType::Long8
            | FieldType::SLong8
            | FieldType::Ifd8 => 8,
        }
    }

    /// Whether values of this type are two's complement signed.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            FieldType::SByte
                | FieldType::SShort
                | FieldType::SLong
                | FieldType::SRational
                | FieldType::SLong8
        )
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_u16() == value)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Ifd => "IFD",
            FieldType::Long8 => "LONG8",
            FieldType::SLong8 => "SLONG8",
            FieldType::Ifd8 => "IFD8",
        }
    }

    /// Maximum bytes that can be stored inline in a classic TIFF IFD entry.
    pub const INLINE_THRESHOLD_TIFF: usize = 4;

    /// Maximum bytes that can be stored inline in a BigTIFF IFD entry.
    pub const INLINE_THRESHOLD_BIGTIFF: usize = 8;

    /// Check if `count` values of this type fit in the entry's inline area.
    #[inline]
    pub fn fits_inline(self, count: u64, is_bigtiff: bool) -> bool {
        let threshold = if is_bigtiff {
            Self::INLINE_THRESHOLD_BIGTIFF
        } else {
            Self::INLINE_THRESHOLD_TIFF
        };
        (self.size_in_bytes() as u64)
            .checked_mul(count)
            .is_some_and(|total| total <= threshold as u64)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// TIFF tag IDs known to the validator.
///
/// Tags not listed here are still decoded; they just carry no schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    // -------------------------------------------------------------------------
    // Baseline
    // -------------------------------------------------------------------------
    NewSubfileType = 254,
    SubfileType = 255,
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    PhotometricInterpretation = 262,
    Threshholding = 263,
    CellWidth = 264,
    CellLength = 265,
    FillOrder = 266,
    ImageDescription = 270,
    Make = 271,
    Model = 272,
    StripOffsets = 273,
    Orientation = 274,
    SamplesPerPixel = 277,
    RowsPerStrip = 278,
    StripByteCounts = 279,
    MinSampleValue = 280,
    MaxSampleValue = 281,
    XResolution = 282,
    YResolution = 283,
    PlanarConfiguration = 284,
    FreeOffsets = 288,
    FreeByteCounts = 289,
    GrayResponseUnit = 290,
    GrayResponseCurve = 291,
    ResolutionUnit = 296,
    Software = 305,
    DateTime = 306,
    Artist = 315,
    HostComputer = 316,
    ColorMap = 320,
    ExtraSamples = 338,
    Copyright = 33432,

    // -------------------------------------------------------------------------
    // Extensions
    // -------------------------------------------------------------------------
    Predictor = 317,
    TileWidth = 322,
    TileLength = 323,
    TileOffsets = 324,
    TileByteCounts = 325,
    SubIfds = 330,
    SampleFormat = 339,
    JpegTables = 347,
    JpegInterchangeFormat = 513,
    JpegInterchangeFormatLength = 514,
    YCbCrSubSampling = 530,
    Xmp = 700,
    ExifIfd = 34665,
    GpsIfd = 34853,
    DateTimeOriginal = 36867,
    DateTimeDigitized = 36868,

    // -------------------------------------------------------------------------
    // DNG and CR2
    // -------------------------------------------------------------------------
    DngVersion = 50706,
    DngBackwardVersion = 50707,
    UniqueCameraModel = 50708,
    DefaultCropOrigin = 50719,
    DefaultCropSize = 50720,
    ActiveArea = 50829,
    Cr2SliceInformation = 50752,
}

impl TiffTag {
    /// Every known tag in id order.
    pub const ALL: [TiffTag; 59] = [
        TiffTag::NewSubfileType,
        TiffTag::SubfileType,
        TiffTag::ImageWidth,
        TiffTag::ImageLength,
        TiffTag::BitsPerSample,
        TiffTag::Compression,
        TiffTag::PhotometricInterpretation,
        TiffTag::Threshholding,
        TiffTag::CellWidth,
        TiffTag::CellLength,
        TiffTag::FillOrder,
        TiffTag::ImageDescription,
        TiffTag::Make,
        TiffTag::Model,
        TiffTag::StripOffsets,
        TiffTag::Orientation,
        TiffTag::SamplesPerPixel,
        TiffTag::RowsPerStrip,
        TiffTag::StripByteCounts,
        TiffTag::MinSampleValue,
        TiffTag::MaxSampleValue,
        TiffTag::XResolution,
        TiffTag::YResolution,
        TiffTag::PlanarConfiguration,
        TiffTag::FreeOffsets,
        TiffTag::FreeByteCounts,
        TiffTag::GrayResponseUnit,
        TiffTag::GrayResponseCurve,
        TiffTag::ResolutionUnit,
        TiffTag::Software,
        TiffTag::DateTime,
        TiffTag::Artist,
        TiffTag::HostComputer,
        TiffTag::Predictor,
        TiffTag::ColorMap,
        TiffTag::TileWidth,
        TiffTag::TileLength,
        TiffTag::TileOffsets,
        TiffTag::TileByteCounts,
        TiffTag::SubIfds,
        TiffTag::ExtraSamples,
        TiffTag::SampleFormat,
        TiffTag::JpegTables,
        TiffTag::JpegInterchangeFormat,
        TiffTag::JpegInterchangeFormatLength,
        TiffTag::YCbCrSubSampling,
        TiffTag::Xmp,
        TiffTag::Copyright,
        TiffTag::ExifIfd,
        TiffTag::GpsIfd,
        TiffTag::DateTimeOriginal,
        TiffTag::DateTimeDigitized,
        TiffTag::DngVersion,
        TiffTag::DngBackwardVersion,
        TiffTag::UniqueCameraModel,
        TiffTag::DefaultCropOrigin,
        TiffTag::DefaultCropSize,
        TiffTag::Cr2SliceInformation,
        TiffTag::ActiveArea,
    ];

    /// Create a TiffTag from its numeric value.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_u16() == value)
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Display name of a tag id, falling back to the number.
pub fn tag_name(tag: u16) -> String {
    match TiffTag::from_u16(tag) {
        Some(known) => format!("{:?}", known),
        None => format!("Tag{}", tag),
    }
}

// =============================================================================
// Field values
// =============================================================================

/// Compression values allowed by the baseline profile.
pub mod compression {
    pub const NONE: u64 = 1;
    pub const CCITT_MODIFIED_HUFFMAN_RLE: u64 = 2;
    pub const JPEG: u64 = 7;
    pub const PACKBITS: u64 = 32773;
}

/// Photometric interpretation values.
pub mod photometric {
    pub const WHITE_IS_ZERO: u64 = 0;
    pub const BLACK_IS_ZERO: u64 = 1;
    pub const RGB: u64 = 2;
    pub const PALETTE: u64 = 3;
    pub const TRANSPARENCY_MASK: u64 = 4;
    pub const SEPARATED: u64 = 5;
    pub const YCBCR: u64 = 6;
    pub const CIELAB: u64 = 8;

    /// Color samples implied by a photometric interpretation, if known.
    pub const fn samples(value: u64) -> Option<u64> {
        match value {
            WHITE_IS_ZERO | BLACK_IS_ZERO | PALETTE | TRANSPARENCY_MASK => Some(1),
            RGB | YCBCR | CIELAB => Some(3),
            SEPARATED => Some(4),
            _ => None,
        }
    }
}

/// Planar configuration: components stored separately.
pub const PLANAR_CONFIGURATION_SEPARATE: u64 = 2;

// =============================================================================
// Tests
// =============================================================================
