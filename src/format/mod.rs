//! Format decoders for TIFF-family and JPEG files.
//!
//! Every supported format implements [`FormatDecoder`]. The closed
//! [`Decoder`] enum wraps the concrete decoders so the registry can hand out
//! a fixed set of them without trait objects.
//!
//! # Control Flow
//!
//! ```text
//! ┌────────┐  identify()   ┌──────────────┐  process()  ┌──────────────┐
//! │ Source │──────────────►│ header check │────────────►│ full walk    │
//! └────────┘               └──────────────┘             └──────┬───────┘
//!                                                              │
//!                                                              ▼
//!                                                       ┌──────────────┐
//!                                                       │ Diagnostics  │
//!                                                       └──────────────┘
//! ```
//!
//! Decoders never return errors for malformed content; everything ends up as
//! a diagnostic event. Only I/O failure stops a decoder early, and it is
//! recorded as a single error event as well.

pub mod jpeg;
pub mod registry;
pub mod tiff;
pub mod xmp;

use std::sync::Arc;

use crate::diagnostics::Diagnostics;
use crate::io::Source;
use crate::messages::{EnglishCatalog, MessageCatalog};

pub use jpeg::JpegDecoder;
pub use registry::{
    create_decoders, decode_file, decode_source, has_known_extension, known_extensions, FileReport,
};
pub use tiff::{FieldSchema, TiffDecoder};

// =============================================================================
// Settings
// =============================================================================

/// How far a decoder goes after identifying a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessMode {
    /// Stop once the format signature is recognized
    Identify,
    /// Walk and validate the whole structure
    #[default]
    Check,
}

/// Immutable configuration shared by every decoder instance.
///
/// Built once at startup and cloned into each worker; the schema and message
/// catalog are reference-counted and never mutated.
#[derive(Debug, Clone)]
pub struct DecoderSettings {
    pub mode: ProcessMode,
    /// Run the TIFF baseline-profile check on the first directory
    pub tiff_baseline: bool,
    pub schema: Arc<FieldSchema>,
    pub messages: Arc<dyn MessageCatalog>,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            mode: ProcessMode::Check,
            tiff_baseline: false,
            schema: Arc::new(FieldSchema::new()),
            messages: Arc::new(EnglishCatalog::new()),
        }
    }
}

impl DecoderSettings {
    pub fn is_identify(&self) -> bool {
        self.mode == ProcessMode::Identify
    }

    /// Fresh event log rendering through the configured catalog.
    pub fn new_diagnostics(&self) -> Diagnostics {
        Diagnostics::new(Arc::clone(&self.messages))
    }
}

// =============================================================================
// FormatDecoder Trait
// =============================================================================

/// Decoder for one file format.
///
/// An instance handles one file at a time and is reused for the next file
/// after [`reset`](Self::reset). Instances are owned by a single worker and
/// never shared between threads while decoding.
pub trait FormatDecoder: Send {
    /// Short format name used in result lines (e.g. `TIFF`, `DNG`, `JPEG`).
    ///
    /// May depend on what the last processed file turned out to be.
    fn short_name(&self) -> &'static str;

    /// Descriptive format name.
    fn long_name(&self) -> &'static str;

    /// Lowercase file extensions, without the dot, this format usually uses.
    fn typical_file_extensions(&self) -> &'static [&'static str];

    /// Check the format signature only.
    ///
    /// Resets the decoder first. Returns `true` if the source carries this
    /// format's signature; diagnostics from the signature check are kept.
    fn identify(&mut self, source: &mut dyn Source) -> bool;

    /// Identify and, unless in identify mode, validate the whole file.
    ///
    /// Resets the decoder first. The outcome is read back through
    /// [`is_format_identified`](Self::is_format_identified) and
    /// [`diagnostics`](Self::diagnostics).
    fn process(&mut self, source: &mut dyn Source);

    /// Whether the last identify/process call recognized the format.
    fn is_format_identified(&self) -> bool;

    /// Events recorded by the last identify/process call.
    fn diagnostics(&self) -> &Diagnostics;

    /// True when no warning or error was recorded.
    fn is_success(&self) -> bool {
        self.diagnostics().is_success()
    }

    /// Return to the pristine state, ready for the next file.
    fn reset(&mut self);
}

// =============================================================================
// Decoder
// =============================================================================

/// The supported formats.
#[derive(Debug)]
pub enum Decoder {
    Tiff(TiffDecoder),
    Jpeg(JpegDecoder),
}

impl Decoder {
    fn inner(&self) -> &dyn FormatDecoder {
        match self {
            Decoder::Tiff(d) => d,
            Decoder::Jpeg(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FormatDecoder {
        match self {
            Decoder::Tiff(d) => d,
            Decoder::Jpeg(d) => d,
        }
    }
}

impl FormatDecoder for Decoder {
    fn short_name(&self) -> &'static str {
        self.inner().short_name()
    }

    fn long_name(&self) -> &'static str {
        self.inner().long_name()
    }

    fn typical_file_extensions(&self) -> &'static [&'static str] {
        self.inner().typical_file_extensions()
    }

    fn identify(&mut self, source: &mut dyn Source) -> bool {
        self.inner_mut().identify(source)
    }

    fn process(&mut self, source: &mut dyn Source) {
        self.inner_mut().process(source)
    }

    fn is_format_identified(&self) -> bool {
        self.inner().is_format_identified()
    }

    fn diagnostics(&self) -> &Diagnostics {
        self.inner().diagnostics()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}
