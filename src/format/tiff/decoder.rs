//! TIFF-family decoder: TIFF, BigTIFF, DNG and CR2.

use std::collections::HashSet;

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::IoError;
use crate::format::{DecoderSettings, FormatDecoder};
use crate::io::{ByteOrder, Source};
use crate::messages::tiff as msg;

use super::baseline::check_baseline;
use super::ifd::{DirectoryWalker, ImageFileDirectory};
use super::parser::{extract_first_offset, identify, TiffHeader};
use super::tags::TiffTag;

/// Number of chained directories in a CR2 file.
pub const CR2_DIRECTORIES: usize = 4;

// =============================================================================
// TiffFileDescription
// =============================================================================

/// Everything learned about one TIFF file.
#[derive(Debug, Clone)]
pub struct TiffFileDescription {
    pub diagnostics: Diagnostics,
    /// Set once the header has been identified
    pub header: Option<TiffHeader>,
    /// Main chain in file order; sub-directories hang off their parent
    pub directories: Vec<ImageFileDirectory>,
    /// Offsets of every directory read so far
    pub visited: HashSet<u64>,
    pub is_dng: bool,
    pub is_cr2: bool,
}

impl TiffFileDescription {
    pub fn new(settings: &DecoderSettings) -> Self {
        Self {
            diagnostics: settings.new_diagnostics(),
            header: None,
            directories: Vec::new(),
            visited: HashSet::new(),
            is_dng: false,
            is_cr2: false,
        }
    }

    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.header.map(|h| h.byte_order)
    }

    pub fn is_big(&self) -> bool {
        self.header.is_some_and(|h| h.is_big())
    }

    /// DNG if the first directory has a DNG version; CR2 if exactly four
    /// directories were read and the last has CR2 slice information.
    pub(crate) fn update_format_flags(&mut self) {
        self.is_dng = self
            .directories
            .first()
            .is_some_and(|ifd| ifd.contains(TiffTag::DngVersion.as_u16()));
        self.is_cr2 = self.directories.len() == CR2_DIRECTORIES
            && self
                .directories
                .last()
                .is_some_and(|ifd| ifd.contains(TiffTag::Cr2SliceInformation.as_u16()));
    }
}

// =============================================================================
// TiffDecoder
// =============================================================================

/// Decoder instance, reusable across files via [`FormatDecoder::reset`].
#[derive(Debug)]
pub struct TiffDecoder {
    settings: DecoderSettings,
    description: TiffFileDescription,
}

impl TiffDecoder {
    pub fn new(settings: DecoderSettings) -> Self {
        let description = TiffFileDescription::new(&settings);
        Self {
            settings,
            description,
        }
    }

    pub fn description(&self) -> &TiffFileDescription {
        &self.description
    }

    fn identify_header(&mut self, source: &mut dyn Source) -> Option<TiffHeader> {
        let header = identify(source, &mut self.description.diagnostics);
        self.description.header = header;
        header
    }

    fn run(&mut self, source: &mut dyn Source) -> Result<(), IoError> {
        let Some(header) = self.identify_header(source) else {
            return Ok(());
        };
        if self.settings.is_identify() {
            return Ok(());
        }

        let first_offset =
            extract_first_offset(source, &header, &mut self.description.diagnostics)?;
        let Some(first_offset) = first_offset else {
            return Ok(());
        };
        DirectoryWalker::new(source, &self.settings, header)
            .walk(first_offset, &mut self.description)?;

        if self.settings.tiff_baseline {
            if let Some(first) = self.description.directories.first() {
                check_baseline(first, &self.settings.schema, &mut self.description.diagnostics);
            }
        }
        Ok(())
    }
}

impl FormatDecoder for TiffDecoder {
    fn short_name(&self) -> &'static str {
        if self.description.is_dng {
            "DNG"
        } else if self.description.is_cr2 {
            "CR2"
        } else {
            "TIFF"
        }
    }

    fn long_name(&self) -> &'static str {
        if self.description.is_dng {
            "Digital Negative"
        } else if self.description.is_cr2 {
            "Canon Raw"
        } else {
            "Tagged Image File Format"
        }
    }

    fn typical_file_extensions(&self) -> &'static [&'static str] {
        &["tif", "tiff", "dng", "cr2"]
    }

    fn identify(&mut self, source: &mut dyn Source) -> bool {
        self.reset();
        self.identify_header(source).is_some()
    }

    fn process(&mut self, source: &mut dyn Source) {
        self.reset();
        if let Err(e) = self.run(source) {
            self.description.diagnostics.error(msg::READING_ERROR, &[&e]);
        }
        debug!(
            source = source.name(),
            directories = self.description.directories.len(),
            events = self.description.diagnostics.len(),
            "processed TIFF"
        );
    }

    fn is_format_identified(&self) -> bool {
        self.description.header.is_some()
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.description.diagnostics
    }

    fn reset(&mut self) {
        self.description = TiffFileDescription::new(&self.settings);
    }
}
