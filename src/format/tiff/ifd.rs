//! Image file directories and the walker that loads them.
//!
//! The walker follows the chain of directories starting at the first offset
//! in the header. Every directory is read in two steps: first its tag count,
//! then all entries plus the trailing next-directory offset. Sub-IFD (330)
//! and GPS (34853) offsets found in a directory are loaded as children.
//!
//! Offsets are untrusted. Each one is bounds-checked before it is read and
//! recorded in a visited set shared by chained and child directories, so a
//! repeated offset ends that branch with an error instead of looping.

use std::collections::HashMap;

use tracing::debug;

use crate::error::IoError;
use crate::format::jpeg::JpegDecoder;
use crate::format::xmp::check_xmp;
use crate::format::{DecoderSettings, FormatDecoder};
use crate::io::{Segment, SectionSource, Source};
use crate::messages::tiff as msg;

use super::decoder::TiffFileDescription;
use super::field::{Field, FieldBudget, FieldReader};
use super::image_data::check_strips_and_tiles;
use super::parser::TiffHeader;
use super::tags::TiffTag;
use super::validation::{validate_entry_order, validate_field, validate_mandatory, validate_samples};

/// Minimum number of entries in a directory.
pub const MIN_TAGS: u64 = 1;

/// Deepest level of sub-directory nesting that is followed.
pub const MAX_DIRECTORY_DEPTH: usize = 8;

// =============================================================================
// ImageFileDirectory
// =============================================================================

/// Where a directory was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryKind {
    /// Part of the chain starting at the header
    Main,
    /// Referenced by a SubIFDs field
    Sub,
    /// Referenced by a GPS field
    Gps,
}

/// One decoded directory.
#[derive(Debug, Clone, Default)]
pub struct ImageFileDirectory {
    /// File offset the directory was read from
    pub offset: u64,
    /// Fields in file order
    pub fields: Vec<Field>,
    by_tag: HashMap<u16, usize>,
    /// Offset of the next chained directory, 0 if none
    pub next_offset: u64,
    pub sub_directories: Vec<ImageFileDirectory>,
    pub gps_directories: Vec<ImageFileDirectory>,
}

impl ImageFileDirectory {
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// Append a field; the first field of a tag wins lookups.
    pub fn push_field(&mut self, field: Field) {
        self.by_tag.entry(field.tag).or_insert(self.fields.len());
        self.fields.push(field);
    }

    pub fn find(&self, tag: u16) -> Option<&Field> {
        self.by_tag.get(&tag).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, tag: u16) -> bool {
        self.by_tag.contains_key(&tag)
    }

    /// First value of a known tag as an unsigned integer.
    pub fn value_u64(&self, tag: TiffTag) -> Option<u64> {
        self.find(tag.as_u16()).and_then(Field::as_u64)
    }

    pub fn num_tags(&self) -> usize {
        self.fields.len()
    }

    /// A directory holding nothing but an embedded JPEG reference.
    pub fn is_thumbnail(&self) -> bool {
        matches!(
            self.fields.as_slice(),
            [a, b] if a.tag == TiffTag::JpegInterchangeFormat.as_u16()
                && b.tag == TiffTag::JpegInterchangeFormatLength.as_u16()
        )
    }
}

// =============================================================================
// DirectoryWalker
// =============================================================================

/// Loads and validates all directories of one file.
pub struct DirectoryWalker<'a> {
    source: &'a mut dyn Source,
    settings: &'a DecoderSettings,
    header: TiffHeader,
    /// Shared by every directory of the file
    budget: FieldBudget,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(source: &'a mut dyn Source, settings: &'a DecoderSettings, header: TiffHeader) -> Self {
        Self {
            source,
            settings,
            header,
            budget: FieldBudget::default(),
        }
    }

    /// Use `budget` for out-of-line field data instead of the default.
    pub fn with_budget(mut self, budget: FieldBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Walk the chain starting at `first_offset` into `description`.
    pub fn walk(
        &mut self,
        first_offset: u64,
        description: &mut TiffFileDescription,
    ) -> Result<(), IoError> {
        let mut offset = first_offset;
        while offset != 0 {
            let index = description.directories.len();
            let Some(ifd) = self.read_directory(offset, DirectoryKind::Main, index, 0, description)?
            else {
                break;
            };
            offset = ifd.next_offset;
            description.directories.push(ifd);
        }
        description.update_format_flags();
        Ok(())
    }

    fn read_directory(
        &mut self,
        offset: u64,
        kind: DirectoryKind,
        index: usize,
        depth: usize,
        description: &mut TiffFileDescription,
    ) -> Result<Option<ImageFileDirectory>, IoError> {
        let diagnostics = &mut description.diagnostics;
        if !description.visited.insert(offset) {
            diagnostics.error(msg::IMAGE_FILE_DIRECTORY_REPEATED, &[&offset]);
            return Ok(None);
        }
        if offset % 2 == 1 {
            diagnostics.warning(msg::ODD_IMAGE_FILE_DIRECTORY_OFFSET, &[&offset]);
        }

        let is_big = self.header.is_big();
        let count_size = self.header.ifd_count_size() as u64;
        if !self.source.is_valid_section(offset, count_size) {
            diagnostics.error(msg::INVALID_FILE_OFFSET, &[&offset, &self.source.len()]);
            return Ok(None);
        }
        let count_bytes = self.source.read_exact_at(offset, count_size as usize)?;
        let mut raw = Segment::new(offset, count_bytes, self.header.byte_order);
        let num_tags = if is_big {
            raw.int64()
        } else {
            u64::from(raw.int16())
        };
        debug!(offset, num_tags, ?kind, "image file directory");
        if num_tags < MIN_TAGS {
            diagnostics.error(msg::TOO_FEW_TAGS, &[&offset, &num_tags, &MIN_TAGS]);
            return Ok(None);
        }

        let body_offset = offset + count_size;
        let body_size = num_tags
            .checked_mul(self.header.ifd_entry_size() as u64)
            .and_then(|s| s.checked_add(self.header.ifd_next_offset_size() as u64))
            .filter(|&s| self.source.is_valid_section(body_offset, s));
        let Some(body_size) = body_size else {
            diagnostics.error(msg::INVALID_FILE_OFFSET, &[&offset, &self.source.len()]);
            return Ok(None);
        };
        let body = self.source.read_exact_at(body_offset, body_size as usize)?;
        raw.append(&body);

        let mut ifd = ImageFileDirectory::new(offset);
        let mut reader = FieldReader::new(
            &mut *self.source,
            &mut self.budget,
            self.header.byte_order,
            is_big,
        );
        let mut previous = None;
        for _ in 0..num_tags {
            let field = reader.read_field(&mut raw, diagnostics)?;
            validate_entry_order(previous, field.tag, diagnostics);
            validate_field(&field, &self.settings.schema, diagnostics);
            previous = Some(field.tag);
            ifd.push_field(field);
        }
        ifd.next_offset = raw.offset_value(is_big);

        self.check_directory(&ifd, kind, index, description);
        self.check_embedded_data(&ifd, description)?;

        if depth < MAX_DIRECTORY_DEPTH {
            let sub_offsets = ifd
                .find(TiffTag::SubIfds.as_u16())
                .map(Field::values_u64)
                .unwrap_or_default();
            for child in sub_offsets.into_iter().filter(|&o| o != 0) {
                if let Some(sub) =
                    self.read_directory(child, DirectoryKind::Sub, index, depth + 1, description)?
                {
                    ifd.sub_directories.push(sub);
                }
            }
            if let Some(child) = ifd.value_u64(TiffTag::GpsIfd).filter(|&o| o != 0) {
                if let Some(gps) =
                    self.read_directory(child, DirectoryKind::Gps, index, depth + 1, description)?
                {
                    ifd.gps_directories.push(gps);
                }
            }
        } else if ifd.contains(TiffTag::SubIfds.as_u16()) || ifd.contains(TiffTag::GpsIfd.as_u16()) {
            description.diagnostics.error(
                msg::IMAGE_FILE_DIRECTORY_NESTING,
                &[&offset, &MAX_DIRECTORY_DEPTH],
            );
        }

        Ok(Some(ifd))
    }

    /// Directory-level checks that need the complete directory.
    fn check_directory(
        &self,
        ifd: &ImageFileDirectory,
        kind: DirectoryKind,
        index: usize,
        description: &mut TiffFileDescription,
    ) {
        if kind == DirectoryKind::Gps
            || ifd.is_thumbnail()
            || ifd.contains(TiffTag::Cr2SliceInformation.as_u16())
        {
            return;
        }
        let diagnostics = &mut description.diagnostics;
        if kind == DirectoryKind::Main {
            validate_mandatory(ifd, index, &self.settings.schema, diagnostics);
        }
        check_strips_and_tiles(ifd, index, self.source.len(), diagnostics);
        validate_samples(ifd, index, diagnostics);
    }

    /// Check the XMP packet and embedded JPEG stream of a directory.
    fn check_embedded_data(
        &mut self,
        ifd: &ImageFileDirectory,
        description: &mut TiffFileDescription,
    ) -> Result<(), IoError> {
        if let Some(xmp) = ifd.find(TiffTag::Xmp.as_u16()) {
            if xmp.raw.len() as u64 == xmp.count {
                check_xmp(&xmp.raw, &mut description.diagnostics);
            }
        }

        let offset = ifd.value_u64(TiffTag::JpegInterchangeFormat);
        let length = ifd.value_u64(TiffTag::JpegInterchangeFormatLength);
        let (Some(offset), Some(length)) = (offset, length) else {
            return Ok(());
        };
        if !self.source.is_valid_section(offset, length) {
            description.diagnostics.error(
                msg::JPEG_INTERCHANGE_FORMAT_OFFSET_AND_SIZE,
                &[&offset, &length],
            );
            return Ok(());
        }
        debug!(offset, length, "embedded JPEG stream");
        let mut section = SectionSource::new(&mut *self.source, offset, length);
        let mut jpeg = JpegDecoder::embedded(self.settings.clone());
        jpeg.process(&mut section);
        description.diagnostics.extend_from(jpeg.diagnostics());
        Ok(())
    }
}
