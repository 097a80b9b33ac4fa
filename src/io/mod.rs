//! I/O layer: sources and the byte cursor decoders read through.

mod segment;
mod source;

pub use segment::{ByteOrder, Segment, MAX_BIG_INT_BYTES};
pub use source::{
    is_valid_section, is_valid_source_offset, FileSource, MemorySource, SectionSource, Source,
};
