//! Start-of-scan reader.

use std::collections::HashSet;

use crate::messages::jpeg as msg;

use super::decoder::JpegFileDescription;
use super::markers::Marker;

pub const MIN_SCAN_COMPONENTS: u8 = 1;
pub const MAX_SCAN_COMPONENTS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegScanComponent {
    pub id: u8,
    pub dc_table: u8,
    pub ac_table: u8,
}

/// A scan header.
#[derive(Debug, Clone, Default)]
pub struct JpegScan {
    pub components: Vec<JpegScanComponent>,
    pub start_spectral: u8,
    pub end_spectral: u8,
    pub approx_high: u8,
    pub approx_low: u8,
}

impl JpegScan {
    /// Spectral selection and approximation of a sequential DCT scan.
    pub fn has_sequential_parameters(&self) -> bool {
        self.start_spectral == 0
            && self.end_spectral == 63
            && self.approx_high == 0
            && self.approx_low == 0
    }
}

/// Read a start-of-scan marker and append the scan to the frame.
///
/// Returns `true` when the scan was recorded.
pub fn read_start_of_scan(marker: &mut Marker, desc: &mut JpegFileDescription) -> bool {
    let Some(frame) = desc.frame.as_mut() else {
        desc.diagnostics.error(msg::SCAN_BEFORE_FRAME, &[]);
        return false;
    };
    let length = marker.length.unwrap_or(0);
    let segment = &mut marker.segment;

    let num_components = segment.int8();
    if !(MIN_SCAN_COMPONENTS..=MAX_SCAN_COMPONENTS).contains(&num_components) {
        desc.diagnostics.error(
            msg::INVALID_NUMBER_OF_SCAN_COMPONENTS,
            &[&num_components, &MIN_SCAN_COMPONENTS, &MAX_SCAN_COMPONENTS],
        );
        return false;
    }
    let expected = 6 + 2 * u16::from(num_components);
    if length != expected {
        desc.diagnostics.error(
            msg::INVALID_SCAN_MARKER_LENGTH,
            &[&num_components, &expected, &length],
        );
        return false;
    }

    let mut scan = JpegScan::default();
    let mut seen = HashSet::new();
    for _ in 0..num_components {
        let id = segment.int8();
        let tables = segment.int8();
        if frame.find_component(id).is_none() {
            desc.diagnostics.error(msg::SCAN_COMPONENT_UNDEFINED, &[&id]);
        }
        if !seen.insert(id) {
            desc.diagnostics.error(msg::SCAN_COMPONENT_TWICE, &[&id]);
        }
        scan.components.push(JpegScanComponent {
            id,
            dc_table: tables >> 4,
            ac_table: tables & 0x0F,
        });
    }
    scan.start_spectral = segment.int8();
    scan.end_spectral = segment.int8();
    let approx = segment.int8();
    scan.approx_high = approx >> 4;
    scan.approx_low = approx & 0x0F;

    if !frame.is_progressive() && !frame.is_lossless() && !scan.has_sequential_parameters() {
        desc.diagnostics.error(
            msg::INVALID_SEQUENTIAL_SCAN_PARAMETERS,
            &[
                &scan.start_spectral,
                &scan.end_spectral,
                &scan.approx_high,
                &scan.approx_low,
            ],
        );
    }

    frame.scans.push(scan);
    true
}
