//! Start-of-frame reader.

use crate::messages::jpeg as msg;

use super::decoder::JpegFileDescription;
use super::markers::{self, Marker};
use super::scan::JpegScan;

/// Smallest SOF payload: precision, height, width and component count.
pub const MIN_FRAME_LENGTH: usize = 6;
pub const PROGRESSIVE_MAX_COMPONENTS: u8 = 4;
pub const MIN_SAMPLING_FACTOR: u8 = 1;
pub const MAX_SAMPLING_FACTOR: u8 = 4;

/// Coding process selected by the SOF marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    Baseline,
    Extended,
    Progressive,
    Lossless,
}

impl FrameClass {
    pub fn from_marker(id: u16) -> Option<Self> {
        match id {
            markers::SOF0 => Some(Self::Baseline),
            markers::SOF1 | markers::SOF5 | markers::SOF9 | markers::SOF13 => Some(Self::Extended),
            markers::SOF2 | markers::SOF6 | markers::SOF10 | markers::SOF14 => {
                Some(Self::Progressive)
            }
            markers::SOF3 | markers::SOF7 | markers::SOF11 | markers::SOF15 => Some(Self::Lossless),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegFrameComponent {
    pub id: u8,
    pub horizontal_sampling: u8,
    pub vertical_sampling: u8,
    pub quantization_table: u8,
}

/// The single frame of a stream and the scans read after it.
#[derive(Debug, Clone)]
pub struct JpegFrame {
    pub marker: u16,
    pub class: FrameClass,
    pub sample_precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<JpegFrameComponent>,
    pub scans: Vec<JpegScan>,
}

impl JpegFrame {
    pub fn is_baseline(&self) -> bool {
        self.class == FrameClass::Baseline
    }

    pub fn is_progressive(&self) -> bool {
        self.class == FrameClass::Progressive
    }

    pub fn is_lossless(&self) -> bool {
        self.class == FrameClass::Lossless
    }

    /// Sequential Huffman-coded DCT: the scans this crate entropy-decodes.
    pub fn is_sequential_huffman(&self) -> bool {
        matches!(self.marker, markers::SOF0 | markers::SOF1)
    }

    pub fn find_component(&self, id: u8) -> Option<&JpegFrameComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn max_horizontal_sampling(&self) -> u8 {
        self.components.iter().map(|c| c.horizontal_sampling).max().unwrap_or(1).max(1)
    }

    pub fn max_vertical_sampling(&self) -> u8 {
        self.components.iter().map(|c| c.vertical_sampling).max().unwrap_or(1).max(1)
    }
}

/// Read a start-of-frame marker into `desc.frame`.
pub fn read_start_of_frame(marker: &mut Marker, desc: &mut JpegFileDescription) {
    let length = marker.length.unwrap_or(0);
    if desc.frame.is_some() {
        desc.diagnostics.error(msg::MULTIPLE_FRAMES, &[]);
    }
    if marker.payload_len() < MIN_FRAME_LENGTH {
        desc.diagnostics
            .error(msg::FRAME_LENGTH_TOO_SMALL, &[&length, &(MIN_FRAME_LENGTH + 2)]);
    }
    if !desc.diagnostics.is_success() {
        return;
    }
    let Some(class) = FrameClass::from_marker(marker.id) else {
        return;
    };

    let segment = &mut marker.segment;
    let sample_precision = segment.int8();
    let height = segment.int16();
    let width = segment.int16();
    let num_components = segment.int8();

    let mut frame = JpegFrame {
        marker: marker.id,
        class,
        sample_precision,
        height,
        width,
        components: Vec::with_capacity(usize::from(num_components)),
        scans: Vec::new(),
    };

    check_sample_precision(&frame, desc);
    if width == 0 {
        desc.diagnostics.error(msg::WIDTH_ZERO, &[]);
    }
    if num_components < 1 {
        desc.diagnostics.error(msg::AT_LEAST_ONE_COMPONENT, &[]);
    } else if frame.is_progressive() && num_components > PROGRESSIVE_MAX_COMPONENTS {
        desc.diagnostics
            .error(msg::PROGRESSIVE_TOO_MANY_COMPONENTS, &[&num_components]);
    }

    let expected = 8 + 3 * u32::from(num_components);
    if u32::from(length) != expected {
        desc.diagnostics
            .error(msg::INVALID_FRAME_LENGTH, &[&num_components, &expected, &length]);
        desc.frame = Some(frame);
        return;
    }

    let max_quantization = if frame.is_lossless() { 0 } else { 3 };
    for _ in 0..num_components {
        let id = segment.int8();
        let sampling = segment.int8();
        let horizontal = sampling >> 4;
        let vertical = sampling & 0x0F;
        let quantization_table = segment.int8();

        if !(MIN_SAMPLING_FACTOR..=MAX_SAMPLING_FACTOR).contains(&horizontal) {
            desc.diagnostics.error(
                msg::INVALID_HORIZONTAL_SAMPLING_FACTOR,
                &[&horizontal, &id, &MIN_SAMPLING_FACTOR, &MAX_SAMPLING_FACTOR],
            );
        }
        if !(MIN_SAMPLING_FACTOR..=MAX_SAMPLING_FACTOR).contains(&vertical) {
            desc.diagnostics.error(
                msg::INVALID_VERTICAL_SAMPLING_FACTOR,
                &[&vertical, &id, &MIN_SAMPLING_FACTOR, &MAX_SAMPLING_FACTOR],
            );
        }
        if quantization_table > max_quantization {
            desc.diagnostics.error(
                msg::INVALID_QUANTIZATION_TABLE,
                &[&id, &quantization_table, &max_quantization],
            );
        }

        if frame.find_component(id).is_some() {
            desc.diagnostics.error(msg::DUPLICATE_FRAME_COMPONENT, &[&id]);
        } else {
            frame.components.push(JpegFrameComponent {
                id,
                horizontal_sampling: horizontal,
                vertical_sampling: vertical,
                quantization_table,
            });
        }
    }
    desc.frame = Some(frame);
}

/// ITU-T T.81 Table B.2.
fn check_sample_precision(frame: &JpegFrame, desc: &mut JpegFileDescription) {
    let p = frame.sample_precision;
    match frame.class {
        FrameClass::Baseline if p != 8 => {
            desc.diagnostics.error(msg::INVALID_SAMPLE_PRECISION_BASELINE, &[&p]);
        }
        FrameClass::Extended if p != 8 && p != 12 => {
            desc.diagnostics.error(msg::INVALID_SAMPLE_PRECISION_EXTENDED, &[&p]);
        }
        FrameClass::Progressive if p != 8 && p != 12 => {
            desc.diagnostics
                .error(msg::INVALID_SAMPLE_PRECISION_PROGRESSIVE, &[&p]);
        }
        FrameClass::Lossless if !(2..=16).contains(&p) => {
            desc.diagnostics.error(msg::INVALID_SAMPLE_PRECISION_LOSSLESS, &[&p]);
        }
        _ => {}
    }
}
