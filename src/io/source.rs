//! Random-access inputs for decoders.
//!
//! [`Source`] is the only way a decoder touches file contents. Files are read
//! through [`FileSource`], test data through [`MemorySource`], and embedded
//! streams (a JPEG inside a TIFF strip, say) through [`SectionSource`], which
//! maps a window of another source to offset zero.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;

use crate::error::IoError;

/// Random-access input that a decoder reads a single file from.
///
/// Reads are positional; implementations keep no cursor that callers depend
/// on. A source is owned by one decoder for the duration of one file.
pub trait Source: Send {
    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Returns an error if the range is out of bounds or if the read fails.
    fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, IoError>;

    /// Total length of the source in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name used in result lines (usually the path).
    fn name(&self) -> &str;

    /// See [`is_valid_section`].
    fn is_valid_section(&self, offset: u64, num_bytes: u64) -> bool {
        is_valid_section(offset, num_bytes, self.len())
    }
}

/// Whether `[offset, offset + num_bytes)` lies inside a source of `length` bytes.
///
/// The sum is computed without overflow; an end exactly at `length` is valid.
#[inline]
pub fn is_valid_section(offset: u64, num_bytes: u64, length: u64) -> bool {
    offset
        .checked_add(num_bytes)
        .is_some_and(|end| end <= length)
}

/// Whether `offset` is a position inside the source or directly at its end.
#[inline]
pub fn is_valid_source_offset(offset: u64, length: u64) -> bool {
    offset <= length
}

// =============================================================================
// MemorySource
// =============================================================================

/// A source backed by an in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    name: String,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
        }
    }
}

impl Source for MemorySource {
    fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        if !self.is_valid_section(offset, len as u64) {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.len(),
            });
        }
        let start = offset as usize;
        Ok(self.data.slice(start..start + len))
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// FileSource
// =============================================================================

/// A source reading from a local file with seek + read.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    length: u64,
    name: String,
}

impl FileSource {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> Result<Self, IoError> {
        let name = path.display().to_string();
        let open_error = |e: std::io::Error| IoError::Open {
            path: name.clone(),
            message: e.to_string(),
        };
        let file = File::open(path).map_err(open_error)?;
        let length = file.metadata().map_err(open_error)?.len();
        Ok(Self { file, length, name })
    }
}

impl Source for FileSource {
    fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        if !self.is_valid_section(offset, len as u64) {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.length,
            });
        }
        let read_error = |e: std::io::Error| IoError::Read {
            offset,
            message: e.to_string(),
        };
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(read_error)?;
        let mut buf = vec![0u8; len];
        self.file.read_exact(&mut buf).map_err(read_error)?;
        Ok(Bytes::from(buf))
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// SectionSource
// =============================================================================

/// A window `[offset, offset + len)` of another source, addressed from zero.
///
/// Used to decode a stream embedded in a container without copying it.
pub struct SectionSource<'a> {
    inner: &'a mut dyn Source,
    offset: u64,
    length: u64,
}

impl<'a> SectionSource<'a> {
    /// The caller must have checked the window with [`is_valid_section`].
    pub fn new(inner: &'a mut dyn Source, offset: u64, length: u64) -> Self {
        Self {
            inner,
            offset,
            length,
        }
    }
}

impl Source for SectionSource<'_> {
    fn read_exact_at(&mut self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        if !self.is_valid_section(offset, len as u64) {
            return Err(IoError::RangeOutOfBounds {
                offset,
                requested: len as u64,
                size: self.length,
            });
        }
        self.inner.read_exact_at(self.offset + offset, len)
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
