//! JPEG decoding tests over synthetic streams.

use imgcheck::diagnostics::ResultStatus;
use imgcheck::messages::jpeg as msg;

use super::test_utils::*;

fn keys(data: &[u8]) -> Vec<&'static str> {
    decode(data).sorted_error_warning_keys()
}

/// One table definition: class/destination byte, counts, symbols.
fn huffman_table(class_and_id: u8, counts: [u8; 16], symbols: &[u8]) -> Vec<u8> {
    let mut payload = vec![class_and_id];
    payload.extend_from_slice(&counts);
    payload.extend_from_slice(symbols);
    payload
}

fn counts_with(first: u8) -> [u8; 16] {
    let mut counts = [0u8; 16];
    counts[0] = first;
    counts
}

// =============================================================================
// Valid Streams
// =============================================================================

#[test]
fn test_baseline_jpeg() {
    let report = decode(&create_test_jpeg());
    assert_eq!(report.format, Some("JPEG"));
    assert!(report.is_ok(), "{}", report.formatted_events);
    assert_eq!(report.to_line(), "test\tJPEG\tOK\t");
}

#[test]
fn test_baseline_multiple_blocks() {
    // 16x16 gray: four blocks, two bits each
    let report = decode(&baseline_jpeg(16, 16, None, &[0x00]));
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_restart_intervals() {
    let data = baseline_jpeg(
        24,
        8,
        Some(1),
        &[0x3F, 0xFF, 0xD0, 0x3F, 0xFF, 0xD1, 0x3F],
    );
    let report = decode(&data);
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_progressive_scan_is_skipped() {
    let report = decode(&create_progressive_jpeg());
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_comment_and_fill_bytes() {
    let data = JpegBuilder::new()
        .comment("made by hand")
        .raw(&[0xFF, 0xFF])
        .eoi()
        .build();
    assert!(decode(&data).is_ok());
}

// =============================================================================
// Stream Structure
// =============================================================================

#[test]
fn test_not_a_jpeg() {
    let report = decode(b"\x89PNG\r\n\x1a\n");
    assert_eq!(report.format, None);
}

#[test]
fn test_missing_end_of_image() {
    let mut data = create_test_jpeg();
    data.truncate(data.len() - 2);
    assert_eq!(keys(&data), vec![msg::UNEXPECTED_END_OF_INPUT]);
}

#[test]
fn test_trailing_data_is_warning() {
    let mut data = create_test_jpeg();
    data.extend_from_slice(b"junk");
    let report = decode(&data);
    assert_eq!(report.status, ResultStatus::Warn);
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![msg::EXTRANEOUS_DATA_AFTER_END_OF_STREAM]
    );
}

#[test]
fn test_truncated_segment() {
    let data = JpegBuilder::new().raw(&[0xFF, 0xE1, 0x10, 0x00, b'E', b'x']).build();
    assert_eq!(keys(&data), vec![msg::UNEXPECTED_END_OF_INPUT]);
}

#[test]
fn test_scan_before_frame() {
    let data = JpegBuilder::new()
        .minimal_huffman_tables()
        .scan(0, 63, 0)
        .eoi()
        .build();
    assert_eq!(keys(&data), vec![msg::SCAN_BEFORE_FRAME]);
}

#[test]
fn test_multiple_frames() {
    let data = JpegBuilder::new()
        .frame(0xC0, 8, 8, 8)
        .frame(0xC0, 8, 8, 8)
        .eoi()
        .build();
    assert_eq!(keys(&data), vec![msg::MULTIPLE_FRAMES]);
}

// =============================================================================
// Frame and Scan Headers
// =============================================================================

#[test]
fn test_baseline_precision() {
    let data = JpegBuilder::new().frame(0xC0, 12, 8, 8).eoi().build();
    assert_eq!(keys(&data), vec![msg::INVALID_SAMPLE_PRECISION_BASELINE]);
}

#[test]
fn test_extended_precision_twelve_is_valid() {
    let data = JpegBuilder::new().frame(0xC1, 12, 8, 8).eoi().build();
    assert!(decode(&data).is_ok());
}

#[test]
fn test_zero_width() {
    let data = JpegBuilder::new().frame(0xC0, 8, 0, 8).eoi().build();
    assert_eq!(keys(&data), vec![msg::WIDTH_ZERO]);
}

#[test]
fn test_scan_component_undefined() {
    let data = JpegBuilder::new()
        .minimal_huffman_tables()
        .frame(0xC0, 8, 8, 8)
        .segment(0xDA, &[1, 7, 0x00, 0, 63, 0])
        .eoi()
        .build();
    assert_eq!(keys(&data), vec![msg::SCAN_COMPONENT_UNDEFINED]);
}

#[test]
fn test_sequential_scan_parameters() {
    let data = JpegBuilder::new()
        .minimal_huffman_tables()
        .frame(0xC0, 8, 8, 8)
        .scan(0, 5, 0)
        .eoi()
        .build();
    assert_eq!(keys(&data), vec![msg::INVALID_SEQUENTIAL_SCAN_PARAMETERS]);
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn test_quantization_precision() {
    let mut payload = vec![0x20];
    payload.extend(std::iter::repeat(1u8).take(64));
    let data = JpegBuilder::new().segment(0xDB, &payload).eoi().build();
    assert_eq!(keys(&data), vec![msg::INVALID_QUANTIZATION_TABLE_PRECISION]);
}

#[test]
fn test_quantization_table_too_short() {
    let data = JpegBuilder::new().segment(0xDB, &[0x00, 1, 2, 3]).eoi().build();
    assert_eq!(keys(&data), vec![msg::NOT_ENOUGH_DATA_FOR_QUANTIZATION_TABLE]);
}

#[test]
fn test_huffman_code_lengths_overflow() {
    let table = huffman_table(0x00, counts_with(3), &[0, 1, 2]);
    let data = JpegBuilder::new().segment(0xC4, &table).eoi().build();
    assert_eq!(keys(&data), vec![msg::INVALID_HUFFMAN_CODE_LENGTHS]);
}

#[test]
fn test_huffman_table_class() {
    let table = huffman_table(0x20, counts_with(1), &[0]);
    let data = JpegBuilder::new().segment(0xC4, &table).eoi().build();
    assert_eq!(keys(&data), vec![msg::INVALID_HUFFMAN_TABLE_CLASS]);
}

#[test]
fn test_restart_interval_length() {
    let data = JpegBuilder::new().segment(0xDD, &[0, 1, 0]).eoi().build();
    assert_eq!(keys(&data), vec![msg::INVALID_RESTART_INTERVAL_LENGTH]);
}

// =============================================================================
// Entropy-Coded Data
// =============================================================================

#[test]
fn test_premature_end_of_scan() {
    let data = baseline_jpeg(32, 32, None, &[0x00]);
    assert_eq!(keys(&data), vec![msg::PREMATURE_END_OF_SCAN_DATA]);
}

#[test]
fn test_restart_markers_wrap_around() {
    // Ten intervals of one block: RST0..RST7, then RST0 again
    let mut scan = vec![0x3F];
    for i in 0..9u8 {
        scan.extend_from_slice(&[0xFF, 0xD0 + i % 8, 0x3F]);
    }
    let report = decode(&baseline_jpeg(80, 8, Some(1), &scan));
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_restart_interval_of_two_blocks() {
    // Two blocks of `00` per interval, padded with ones
    let data = baseline_jpeg(32, 8, Some(2), &[0x0F, 0xFF, 0xD0, 0x0F]);
    let report = decode(&data);
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_zero_restart_interval_disables_restarts() {
    let data = baseline_jpeg(16, 16, Some(0), &[0x00]);
    assert!(decode(&data).is_ok());
}

#[test]
fn test_missing_restart_marker() {
    let data = baseline_jpeg(16, 8, Some(1), &[0x3F, 0x3F]);
    assert_eq!(keys(&data), vec![msg::MISSING_RESTART_MARKER]);
}

#[test]
fn test_restart_marker_out_of_sequence_later() {
    let data = baseline_jpeg(
        24,
        8,
        Some(1),
        &[0x3F, 0xFF, 0xD0, 0x3F, 0xFF, 0xD0, 0x3F],
    );
    assert_eq!(keys(&data), vec![msg::UNEXPECTED_RESTART_MARKER]);
}

#[test]
fn test_wrong_restart_marker() {
    let data = baseline_jpeg(16, 8, Some(1), &[0x3F, 0xFF, 0xD3, 0x3F]);
    assert_eq!(keys(&data), vec![msg::UNEXPECTED_RESTART_MARKER]);
}

#[test]
fn test_ac_coefficient_overflow() {
    // AC table codes only ZRL; five zero bits run past the block end
    let data = JpegBuilder::new()
        .quantization_table()
        .segment(0xC4, &huffman_table(0x00, counts_with(1), &[0x00]))
        .segment(0xC4, &huffman_table(0x10, counts_with(1), &[0xF0]))
        .frame(0xC0, 8, 8, 8)
        .scan(0, 63, 0)
        .raw(&[0x00])
        .eoi()
        .build();
    assert_eq!(keys(&data), vec![msg::AC_COEFFICIENT_OVERFLOW]);
}

#[test]
fn test_several_frame_errors_are_numbered() {
    let data = JpegBuilder::new()
        .frame(0xC0, 12, 0, 8)
        .eoi()
        .build();
    let report = decode(&data);
    assert_eq!(report.status, ResultStatus::Error);
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![msg::INVALID_SAMPLE_PRECISION_BASELINE, msg::WIDTH_ZERO]
    );
    assert!(report.to_line().contains("(1) "));
    assert!(report.to_line().contains("(2) "));
}
