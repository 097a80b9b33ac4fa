//! JPEG decoder: marker loop, table and header readers, scan decoding.

use bytes::Bytes;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::IoError;
use crate::format::{DecoderSettings, FormatDecoder};
use crate::io::{ByteOrder, Segment, Source};
use crate::messages::jpeg as msg;

use super::entropy::{decode_sequential_scan, read_entropy_coded_data};
use super::frame::{read_start_of_frame, JpegFrame};
use super::huffman::JpegHuffmanTable;
use super::markers::{self, has_length, is_marker, is_start_of_frame, marker_name, Marker};
use super::scan::read_start_of_scan;
use super::tables::{
    read_huffman_tables, read_quantization_tables, read_restart_interval, JpegQuantizationTable,
};

/// Size of a marker id and of a length field.
const MARKER_SIZE: u64 = 2;

// =============================================================================
// JpegFileDescription
// =============================================================================

/// Everything learned about one JPEG stream.
#[derive(Debug, Clone)]
pub struct JpegFileDescription {
    pub diagnostics: Diagnostics,
    /// Stream lives inside another container; trailing data is not checked
    pub embedded: bool,
    pub identified: bool,
    /// Markers in stream order, SOI first
    pub markers: Vec<Marker>,
    pub frame: Option<JpegFrame>,
    /// Indexed by class (DC, AC) and destination
    pub huffman_tables: [[Option<JpegHuffmanTable>; 4]; 2],
    pub quantization_tables: [Option<JpegQuantizationTable>; 4],
    /// MCUs per restart interval; zero when disabled
    pub restart_interval: u16,
}

impl JpegFileDescription {
    pub fn new(settings: &DecoderSettings, embedded: bool) -> Self {
        Self {
            diagnostics: settings.new_diagnostics(),
            embedded,
            identified: false,
            markers: Vec::new(),
            frame: None,
            huffman_tables: Default::default(),
            quantization_tables: Default::default(),
            restart_interval: 0,
        }
    }

    pub fn num_scans(&self) -> usize {
        self.frame.as_ref().map_or(0, |f| f.scans.len())
    }
}

// =============================================================================
// JpegDecoder
// =============================================================================

#[derive(Debug)]
pub struct JpegDecoder {
    settings: DecoderSettings,
    embedded: bool,
    description: JpegFileDescription,
}

impl JpegDecoder {
    /// Decoder for standalone JPEG files.
    pub fn new(settings: DecoderSettings) -> Self {
        Self::with_embedding(settings, false)
    }

    /// Decoder for a stream inside another container, e.g. a TIFF thumbnail.
    pub fn embedded(settings: DecoderSettings) -> Self {
        Self::with_embedding(settings, true)
    }

    fn with_embedding(settings: DecoderSettings, embedded: bool) -> Self {
        let description = JpegFileDescription::new(&settings, embedded);
        Self {
            settings,
            embedded,
            description,
        }
    }

    pub fn description(&self) -> &JpegFileDescription {
        &self.description
    }

    /// Check that the stream starts with SOI.
    fn identify_start(&mut self, source: &mut dyn Source) -> bool {
        let diagnostics = &mut self.description.diagnostics;
        let bytes = match source.read_exact_at(0, MARKER_SIZE as usize) {
            Ok(bytes) => bytes,
            Err(e) => {
                diagnostics.error(msg::CANNOT_READ_HEADER, &[&e]);
                return false;
            }
        };
        let id = u16::from_be_bytes([bytes[0], bytes[1]]);
        if !is_marker(id) {
            diagnostics.error(msg::INVALID_MARKER, &[&marker_name(id), &0]);
            return false;
        }
        if id != markers::SOI {
            diagnostics.error(msg::FIRST_MARKER_NOT_SOI, &[&marker_name(id)]);
            return false;
        }
        self.description.markers.push(Marker {
            id,
            length: None,
            offset: 0,
            number: 1,
            segment: Segment::new(MARKER_SIZE, Bytes::new(), ByteOrder::BigEndian),
        });
        self.description.identified = true;
        true
    }

    /// Read markers after SOI until EOI or the first problem.
    fn process_markers(&mut self, source: &mut dyn Source) -> Result<(), IoError> {
        let length = source.len();
        let mut offset = MARKER_SIZE;
        let mut number = 2;

        loop {
            if !source.is_valid_section(offset, MARKER_SIZE) {
                self.description
                    .diagnostics
                    .error(msg::UNEXPECTED_END_OF_INPUT, &[&offset, &MARKER_SIZE, &length]);
                return Ok(());
            }
            let bytes = source.read_exact_at(offset, MARKER_SIZE as usize)?;
            let id = u16::from_be_bytes([bytes[0], bytes[1]]);
            if id == markers::FILL {
                offset += 1;
                continue;
            }
            if !is_marker(id) || id == markers::MARKER_MASK {
                self.description
                    .diagnostics
                    .error(msg::INVALID_MARKER, &[&marker_name(id), &offset]);
                return Ok(());
            }
            if id == markers::SOI {
                self.description
                    .diagnostics
                    .error(msg::SOI_FIRST_MARKER_ONLY, &[&offset]);
                return Ok(());
            }

            let mut next = offset + MARKER_SIZE;
            let mut marker = Marker {
                id,
                length: None,
                offset,
                number,
                segment: Segment::new(next, Bytes::new(), ByteOrder::BigEndian),
            };
            number += 1;

            if has_length(id) {
                if !source.is_valid_section(next, MARKER_SIZE) {
                    self.description
                        .diagnostics
                        .error(msg::UNEXPECTED_END_OF_INPUT, &[&next, &MARKER_SIZE, &length]);
                    return Ok(());
                }
                let bytes = source.read_exact_at(next, MARKER_SIZE as usize)?;
                let declared = u16::from_be_bytes([bytes[0], bytes[1]]);
                if u64::from(declared) < MARKER_SIZE {
                    self.description.diagnostics.error(
                        msg::INVALID_MARKER_LENGTH,
                        &[&marker_name(id), &offset, &declared],
                    );
                    return Ok(());
                }
                next += MARKER_SIZE;
                let payload = u64::from(declared) - MARKER_SIZE;
                if !source.is_valid_section(next, payload) {
                    self.description
                        .diagnostics
                        .error(msg::UNEXPECTED_END_OF_INPUT, &[&next, &payload, &length]);
                    return Ok(());
                }
                let data = if payload == 0 {
                    Bytes::new()
                } else {
                    source.read_exact_at(next, payload as usize)?
                };
                marker.length = Some(declared);
                marker.segment = Segment::new(next, data, ByteOrder::BigEndian);
                next += payload;
            }
            debug!(
                offset,
                marker = %marker.name(),
                length = ?marker.length,
                "JPEG marker"
            );

            let scan_recorded = self.handle_marker(&mut marker);
            if scan_recorded && self.description.diagnostics.is_success() {
                let data = read_entropy_coded_data(source, next)?;
                let data_len = data.len() as u64;
                let decodable = self
                    .description
                    .frame
                    .as_ref()
                    .is_some_and(JpegFrame::is_sequential_huffman);
                if decodable {
                    let scan_number = self.description.num_scans();
                    decode_sequential_scan(&mut self.description, data, next, scan_number);
                }
                next += data_len;
            }
            self.description.markers.push(marker);
            offset = next;

            if !self.description.diagnostics.is_success() {
                return Ok(());
            }
            if id == markers::EOI {
                break;
            }
        }

        if !self.embedded && offset != length {
            self.description
                .diagnostics
                .warning(msg::EXTRANEOUS_DATA_AFTER_END_OF_STREAM, &[&offset, &length]);
        }
        Ok(())
    }

    /// Parse the payload of `marker`. Returns `true` for a recorded scan.
    fn handle_marker(&mut self, marker: &mut Marker) -> bool {
        let desc = &mut self.description;
        match marker.id {
            id if is_start_of_frame(id) => read_start_of_frame(marker, desc),
            markers::SOS => return read_start_of_scan(marker, desc),
            markers::DHT => read_huffman_tables(marker, desc),
            markers::DQT => read_quantization_tables(marker, desc),
            markers::DRI => read_restart_interval(marker, desc),
            _ => {}
        }
        false
    }
}

impl FormatDecoder for JpegDecoder {
    fn short_name(&self) -> &'static str {
        "JPEG"
    }

    fn long_name(&self) -> &'static str {
        "Joint Photographic Experts Group"
    }

    fn typical_file_extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg"]
    }

    fn identify(&mut self, source: &mut dyn Source) -> bool {
        self.reset();
        self.identify_start(source)
    }

    fn process(&mut self, source: &mut dyn Source) {
        self.reset();
        if !self.identify_start(source) || self.settings.is_identify() {
            return;
        }
        if let Err(e) = self.process_markers(source) {
            self.description.diagnostics.error(msg::READING_ERROR, &[&e]);
        }
        debug!(
            source = source.name(),
            markers = self.description.markers.len(),
            scans = self.description.num_scans(),
            "processed JPEG"
        );
    }

    fn is_format_identified(&self) -> bool {
        self.description.identified
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.description.diagnostics
    }

    fn reset(&mut self) {
        self.description = JpegFileDescription::new(&self.settings, self.embedded);
    }
}
