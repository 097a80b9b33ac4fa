//! JPEG stream validation (ITU-T T.81).
//!
//! # Stream Layout
//!
//! ```text
//! SOI  [tables / misc]*  SOF  [tables / misc]*  (SOS entropy-data [tables]*)+  EOI
//!
//! tables / misc = DQT | DHT | DRI | APPn | COM | DNL
//! ```
//!
//! The decoder walks markers in order, reads frame, scan and table
//! segments, and for sequential Huffman frames decodes each scan's
//! entropy-coded data block by block to verify it. Progressive, lossless and
//! arithmetic-coded scans are skipped at the byte level.
//!
//! The same decoder validates JPEG thumbnails embedded in TIFF files, in
//! which case bytes after the end-of-image marker are not reported.

mod decoder;
mod entropy;
mod frame;
mod huffman;
mod markers;
mod scan;
mod tables;

pub use decoder::{JpegDecoder, JpegFileDescription};
pub use entropy::{extend, read_entropy_coded_data, BitError, BitReader, RestartError};
pub use frame::{FrameClass, JpegFrame, JpegFrameComponent};
pub use huffman::{
    generate_code_table, generate_size_table, HuffmanTableError, JpegHuffmanTable,
    TABLE_CLASS_AC, TABLE_CLASS_DC,
};
pub use markers::{has_length, is_marker, marker_name, Marker};
pub use scan::{JpegScan, JpegScanComponent};
pub use tables::JpegQuantizationTable;
