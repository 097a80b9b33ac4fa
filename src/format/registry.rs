//! Decoder registry and per-file dispatch.
//!
//! The registry is a fixed list: TIFF first, then JPEG. A file is offered to
//! each decoder in turn; the first one that identifies it processes it and
//! its diagnostics become the file's [`FileReport`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{DiagnosticEvent, ResultStatus};
use crate::error::DecodeError;
use crate::io::{FileSource, Source};

use super::{Decoder, DecoderSettings, FormatDecoder, JpegDecoder, TiffDecoder};

// =============================================================================
// Registry
// =============================================================================

/// One fresh instance of every supported decoder, in dispatch order.
pub fn create_decoders(settings: &DecoderSettings) -> Vec<Decoder> {
    vec![
        Decoder::Tiff(TiffDecoder::new(settings.clone())),
        Decoder::Jpeg(JpegDecoder::new(settings.clone())),
    ]
}

/// Union of the typical extensions of all decoders, lowercase.
pub fn known_extensions(decoders: &[Decoder]) -> BTreeSet<&'static str> {
    decoders
        .iter()
        .flat_map(|d| d.typical_file_extensions().iter().copied())
        .collect()
}

/// Whether `path` ends in one of `extensions`, ignoring case.
pub fn has_known_extension(path: &Path, extensions: &BTreeSet<&'static str>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(e.to_ascii_lowercase().as_str()))
}

// =============================================================================
// FileReport
// =============================================================================

/// Outcome of decoding one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    /// Short format name, `None` if no decoder identified the file
    pub format: Option<&'static str>,
    pub status: ResultStatus,
    /// Rendered status text (e.g. `OK`)
    pub message: String,
    pub events: Vec<DiagnosticEvent>,
    /// Formatted warning and error messages
    #[serde(skip)]
    pub formatted_events: String,
    #[serde(skip)]
    error_warning_keys: Vec<&'static str>,
}

impl FileReport {
    pub fn unidentified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: None,
            status: ResultStatus::Unknown,
            message: String::new(),
            events: Vec::new(),
            formatted_events: String::new(),
            error_warning_keys: Vec::new(),
        }
    }

    /// Report for a file `decoder` has identified and processed.
    pub fn from_decoder(path: impl Into<String>, decoder: &dyn FormatDecoder) -> Self {
        let diagnostics = decoder.diagnostics();
        let status = diagnostics.result_status();
        let message = status
            .message_key()
            .map(|key| diagnostics.messages().msg(key, &[]))
            .unwrap_or_default();
        Self {
            path: path.into(),
            format: Some(decoder.short_name()),
            status,
            message,
            events: diagnostics.events().to_vec(),
            formatted_events: diagnostics.format_events(),
            error_warning_keys: diagnostics.sorted_error_warning_keys(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }

    /// Tab-separated result line: `path, format, status, events`, or
    /// `path, ?` followed by an empty field for unidentified files.
    pub fn to_line(&self) -> String {
        match self.format {
            None => format!("{}\t?\t", self.path),
            Some(format) => format!(
                "{}\t{}\t{}\t{}",
                self.path, format, self.message, self.formatted_events
            ),
        }
    }

    /// Sorted, deduplicated keys of warning and error events, as taken from
    /// the decoder's diagnostics.
    pub fn sorted_error_warning_keys(&self) -> Vec<&'static str> {
        self.error_warning_keys.clone()
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Offer `source` to each decoder until one identifies it.
pub fn decode_source(
    decoders: &mut [Decoder],
    settings: &DecoderSettings,
    source: &mut dyn Source,
) -> FileReport {
    for decoder in decoders.iter_mut() {
        if !decoder.identify(source) {
            continue;
        }
        if !settings.is_identify() {
            decoder.process(source);
        }
        debug!(
            source = source.name(),
            format = decoder.short_name(),
            events = decoder.diagnostics().len(),
            "decoded"
        );
        return FileReport::from_decoder(source.name(), &*decoder);
    }
    FileReport::unidentified(source.name())
}

/// Open `path` and decode it.
///
/// # Errors
///
/// Returns an error only if the file cannot be opened.
pub fn decode_file(
    decoders: &mut [Decoder],
    settings: &DecoderSettings,
    path: &Path,
) -> Result<FileReport, DecodeError> {
    let mut source = FileSource::open(path)?;
    Ok(decode_source(decoders, settings, &mut source))
}
