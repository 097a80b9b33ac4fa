//! TIFF structure validation.
//!
//! This module handles TIFF and BigTIFF files and their raw-camera relatives
//! DNG and CR2.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. All multi-byte values must be read respecting this order.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets and 12-byte entries,
//!   BigTIFF uses 64-bit offsets and 20-byte entries. The walker handles both.
//!
//! - **IFD (Image File Directory)**: A list of typed fields, chained through a
//!   next-offset and optionally nesting sub-directories.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD entry,
//!   larger values are stored at an offset pointed to by the entry.

mod baseline;
mod datetime;
mod decoder;
mod field;
mod ifd;
mod image_data;
mod parser;
mod schema;
mod tags;
mod validation;

pub use baseline::check_baseline;
pub use datetime::{is_valid_date_time, parse_date_time};
pub use decoder::{TiffDecoder, TiffFileDescription, CR2_DIRECTORIES};
pub use field::{
    decoded_size, Field, FieldBudget, FieldReader, Value, MAX_FIELD_DATA_SIZE,
    MAX_TOTAL_FIELD_DATA_SIZE,
};
pub use ifd::{DirectoryKind, DirectoryWalker, ImageFileDirectory, MAX_DIRECTORY_DEPTH};
pub use parser::{TiffHeader, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE};
pub use schema::{FieldDescription, FieldSchema, UNBOUNDED};
pub use tags::{compression, photometric, tag_name, FieldType, TiffTag};
