//! # imgcheck
//!
//! Structural validation for TIFF-family and JPEG image files.
//!
//! Files are checked without decoding pixels: headers, directory chains,
//! field types and counts, marker sequences, table definitions and
//! entropy-coded scan data. Every problem found is recorded as a diagnostic
//! event with a severity, and each file ends up in one of the result
//! buckets OK, Warning or Error.
//!
//! ## Architecture
//!
//! - [`io`] - Byte sources, segment cursor and bounds checks
//! - [`diagnostics`] - Severity, events and per-file event logs
//! - [`messages`] - Message keys and the English catalog
//! - [`mod@format`] - The decoder trait, TIFF and JPEG decoders, registry
//! - [`config`] - CLI and configuration types
//! - [`worker`] - Worker pool dispatching files to decoders
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use imgcheck::{create_decoders, decode_file, DecoderSettings};
//!
//! let settings = DecoderSettings::default();
//! let mut decoders = create_decoders(&settings);
//! let report = decode_file(&mut decoders, &settings, Path::new("photo.jpg")).unwrap();
//! println!("{}", report.to_line());
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod io;
pub mod messages;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use diagnostics::{DiagnosticEvent, Diagnostics, ResultStatus, Severity};
pub use error::{DecodeError, IoError};
pub use format::{
    create_decoders, decode_file, decode_source, known_extensions, Decoder, DecoderSettings,
    FileReport, FormatDecoder, JpegDecoder, ProcessMode, TiffDecoder,
};
pub use io::{ByteOrder, FileSource, MemorySource, Segment, Source};
pub use messages::{EnglishCatalog, MessageCatalog};
