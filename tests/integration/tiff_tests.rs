//! TIFF decoding tests over synthetic files.

use imgcheck::diagnostics::ResultStatus;
use imgcheck::format::tiff::{
    decoded_size, FieldType, MAX_DIRECTORY_DEPTH, MAX_FIELD_DATA_SIZE, MAX_TOTAL_FIELD_DATA_SIZE,
};
use imgcheck::format::{DecoderSettings, ProcessMode};
use imgcheck::messages::{jpeg as jpeg_msg, tiff as msg, xmp as xmp_msg};

use super::test_utils::*;

fn keys(data: &[u8]) -> Vec<&'static str> {
    decode(data).sorted_error_warning_keys()
}

/// Gray strip image with `entries` BYTE fields that all point at one
/// `window`-byte block appended after the directory.
fn shared_window_tiff(entries: u16, window: usize) -> Vec<u8> {
    let ifd = |offset: u64| {
        (0..entries).fold(IfdBuilder::gray_strip(8, 4), |ifd, i| {
            ifd.raw_entry(65000 + i, BYTE, window as u64, offset)
        })
    };
    let base = TiffBuilder::new().add_ifd(ifd(0)).build().len();
    let offset = base + base % 2;
    TiffBuilder::new()
        .add_ifd(ifd(offset as u64))
        .with_trailing(&vec![0; offset - base + window])
        .build()
}

/// Little-endian file whose directories each hold the next one as their
/// only SubIFD, `levels` directories deep.
fn nested_sub_ifds(levels: u32, last_has_child: bool) -> Vec<u8> {
    const DIR_SIZE: u32 = 100;
    let strip = 8 + DIR_SIZE * (levels + 1);
    let mut data = vec![0u8; strip as usize + 2];
    data[..8].copy_from_slice(b"II*\0\x08\0\0\0");
    for level in 0..levels {
        let at = 8 + DIR_SIZE * level;
        let mut entries = vec![
            (256, SHORT, 1),
            (257, SHORT, 1),
            (262, SHORT, 1),
            (273, LONG, strip),
            (278, LONG, 1),
            (279, LONG, 1),
        ];
        if level + 1 < levels || last_has_child {
            entries.push((330, LONG, at + DIR_SIZE));
        }
        let mut pos = at as usize;
        data[pos..pos + 2].copy_from_slice(&(entries.len() as u16).to_le_bytes());
        pos += 2;
        for (tag, field_type, value) in entries {
            data[pos..pos + 2].copy_from_slice(&u16::to_le_bytes(tag));
            data[pos + 2..pos + 4].copy_from_slice(&field_type.to_le_bytes());
            data[pos + 4..pos + 8].copy_from_slice(&1u32.to_le_bytes());
            data[pos + 8..pos + 12].copy_from_slice(&value.to_le_bytes());
            pos += 12;
        }
    }
    data
}

// =============================================================================
// Layouts
// =============================================================================

#[test]
fn test_little_endian_strip_tiff() {
    let data = create_strip_tiff();
    assert!(is_tiff_magic(&data));

    let report = decode(&data);
    assert_eq!(report.format, Some("TIFF"));
    assert!(report.is_ok(), "{}", report.formatted_events);
    assert_eq!(report.to_line(), "test\tTIFF\tOK\t");
}

#[test]
fn test_big_endian_strip_tiff() {
    let data = TiffBuilder::new()
        .with_byte_order(ByteOrderType::BigEndian)
        .add_ifd(IfdBuilder::gray_strip(16, 16))
        .build();
    assert_eq!(&data[..4], b"MM\0*");

    let report = decode(&data);
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_bigtiff() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let data = TiffBuilder::new()
            .with_byte_order(order)
            .with_bigtiff(true)
            .add_ifd(IfdBuilder::gray_strip(8, 8).entry(282, RATIONAL, &[72, 1]))
            .build();
        let report = decode(&data);
        assert_eq!(report.format, Some("TIFF"));
        assert!(report.is_ok(), "{}", report.formatted_events);
    }
}

#[test]
fn test_bigtiff_long8_strip_offsets() {
    let ifd = IfdBuilder::gray_strip(4, 4)
        .without(273)
        .entry(273, LONG8, &[64])
        .entry(279, LONG, &[16]);
    let data = TiffBuilder::new()
        .with_bigtiff(true)
        .add_ifd(ifd)
        .with_trailing(&[0; 64])
        .build();
    assert!(decode(&data).is_ok());
}

#[test]
fn test_multiple_directories() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).ascii(305, "imgcheck"))
        .add_ifd(IfdBuilder::gray_strip(4, 4))
        .build();
    assert!(decode(&data).is_ok());
}

#[test]
fn test_rational_and_ascii_fields() {
    let ifd = IfdBuilder::gray_strip(8, 8)
        .ascii(271, "Maker")
        .ascii(306, "2024:02:29 23:59:59")
        .entry(282, RATIONAL, &[300, 1])
        .entry(283, RATIONAL, &[300, 1])
        .entry(296, SHORT, &[2]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    let report = decode(&data);
    assert!(report.is_ok(), "{}", report.formatted_events);
}

// =============================================================================
// Format Flavors
// =============================================================================

#[test]
fn test_dng_short_name() {
    let ifd = IfdBuilder::gray_strip(8, 8).bytes(50706, BYTE, &[1, 4, 0, 0]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    let report = decode(&data);
    assert_eq!(report.format, Some("DNG"));
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_thumbnail_directory_with_embedded_jpeg() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8))
        .add_ifd(IfdBuilder::new().with_jpeg(create_test_jpeg()))
        .build();
    let report = decode(&data);
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_broken_embedded_jpeg_is_reported() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).with_jpeg(vec![0xFF, 0xD8, 0xFF, 0xD8]))
        .build();
    let report = decode(&data);
    assert_eq!(report.format, Some("TIFF"));
    assert_eq!(report.status, ResultStatus::Error);
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![jpeg_msg::SOI_FIRST_MARKER_ONLY]
    );
}

#[test]
fn test_embedded_jpeg_trailing_data_is_ignored() {
    let mut jpeg = create_test_jpeg();
    jpeg.extend_from_slice(&[0, 0, 0, 0]);
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).with_jpeg(jpeg))
        .build();
    assert!(decode(&data).is_ok());
}

// =============================================================================
// Structural Errors
// =============================================================================

#[test]
fn test_invalid_version_is_not_identified() {
    let mut data = create_strip_tiff();
    data[2] = 7;
    let report = decode(&data);
    assert_eq!(report.format, None);
    assert_eq!(report.to_line(), "test\t?\t");
}

#[test]
fn test_truncated_directory() {
    let mut data = create_strip_tiff();
    data.truncate(20);
    assert_eq!(keys(&data), vec![msg::INVALID_FILE_OFFSET]);
}

#[test]
fn test_first_offset_outside_file() {
    let mut data = create_strip_tiff();
    data[4..8].copy_from_slice(&100_000u32.to_le_bytes());
    assert_eq!(keys(&data), vec![msg::INVALID_FILE_OFFSET]);
}

#[test]
fn test_missing_mandatory_field() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).without(262))
        .build();
    assert_eq!(keys(&data), vec![msg::MISSING_MANDATORY_FIELD]);
}

#[test]
fn test_no_strip_or_tile_fields() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).without(273).without(278))
        .build();
    assert_eq!(keys(&data), vec![msg::NO_STRIP_OR_TILE_FIELDS]);
}

#[test]
fn test_strip_outside_file() {
    let ifd = IfdBuilder::gray_strip(8, 8)
        .without(273)
        .entry(273, LONG, &[100_000])
        .entry(279, LONG, &[64]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::IMAGE_DATA_OFFSET_AND_SIZE]);
}

#[test]
fn test_samples_per_pixel_mismatch() {
    let ifd = IfdBuilder::gray_strip(8, 8).without(277).entry(277, SHORT, &[3]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::UNEXPECTED_NUMBER_OF_SAMPLES]);
}

#[test]
fn test_unknown_field_type() {
    let ifd = IfdBuilder::gray_strip(8, 8).raw_entry(40000, 99, 1, 0);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::UNKNOWN_FIELD_TYPE]);
}

#[test]
fn test_field_data_outside_file() {
    let ifd = IfdBuilder::gray_strip(8, 8).raw_entry(305, ASCII, 40, 100_000);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::INVALID_FIELD_OFFSET_AND_SIZE]);
}

#[test]
fn test_invalid_date_time() {
    let ifd = IfdBuilder::gray_strip(8, 8).ascii(306, "2023:13:45 10:00:00");
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::INVALID_DATE_TIME]);
}

#[test]
fn test_zero_denominator() {
    let ifd = IfdBuilder::gray_strip(8, 8).entry(282, RATIONAL, &[72, 0]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert_eq!(keys(&data), vec![msg::DENOMINATOR_ZERO]);
}

#[test]
fn test_sub_directories_up_to_depth_limit() {
    let depth = MAX_DIRECTORY_DEPTH as u32;
    let report = decode(&nested_sub_ifds(depth + 1, false));
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_sub_directories_nested_too_deep() {
    let depth = MAX_DIRECTORY_DEPTH as u32;
    assert_eq!(
        keys(&nested_sub_ifds(depth + 1, true)),
        vec![msg::IMAGE_FILE_DIRECTORY_NESTING]
    );
}

// =============================================================================
// Field Data Limits
// =============================================================================

#[test]
fn test_field_data_too_large() {
    // 700 kB of raw data, but many times that once decoded
    let ifd = IfdBuilder::gray_strip(8, 4).bytes(65000, UNDEFINED, &vec![0; 700_000]);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert!((data.len() as u64) < MAX_FIELD_DATA_SIZE);
    assert_eq!(keys(&data), vec![msg::FIELD_DATA_TOO_LARGE]);
}

#[test]
fn test_single_large_field_is_loaded() {
    let report = decode(&shared_window_tiff(1, 400_000));
    assert!(report.is_ok(), "{}", report.formatted_events);
}

#[test]
fn test_fields_sharing_a_window_exhaust_the_budget() {
    let window = 400_000;
    let report = decode(&shared_window_tiff(10, window));
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![msg::FIELD_DATA_BUDGET_EXHAUSTED]
    );

    // Fields loaded before the budget ran out stay within it
    let rejected = report
        .events
        .iter()
        .filter(|e| e.key == msg::FIELD_DATA_BUDGET_EXHAUSTED)
        .count() as u64;
    let loaded = 10 - rejected;
    assert!(loaded >= 1);
    assert!(loaded * decoded_size(FieldType::Byte, window as u64).unwrap() <= MAX_TOTAL_FIELD_DATA_SIZE);
}

// =============================================================================
// XMP
// =============================================================================

#[test]
fn test_xmp_packet() {
    let packet = b"<?xpacket begin=\"\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\
        <x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/><?xpacket end=\"w\"?>";
    let ifd = IfdBuilder::gray_strip(8, 8).bytes(700, UNDEFINED, packet);
    let data = TiffBuilder::new().add_ifd(ifd).build();
    assert!(decode(&data).is_ok());
}

#[test]
fn test_xmp_without_trailer_is_warning() {
    let ifd = IfdBuilder::gray_strip(8, 8).bytes(700, BYTE, b"<?xpacket begin=\"\"?><x:xmpmeta/>");
    let data = TiffBuilder::new().add_ifd(ifd).build();
    let report = decode(&data);
    assert_eq!(report.status, ResultStatus::Warn);
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![xmp_msg::MISSING_XPACKET_END]
    );
    assert_eq!(report.to_line(), "test\tTIFF\tWarning\tXMP packet has no xpacket trailer.");
}

// =============================================================================
// Settings
// =============================================================================

#[test]
fn test_baseline_profile() {
    let settings = DecoderSettings {
        tiff_baseline: true,
        ..DecoderSettings::default()
    };

    let report = decode_with(&create_strip_tiff(), "a.tif", &settings);
    assert!(report.is_ok(), "{}", report.formatted_events);
    assert!(report.events.iter().any(|e| e.key == msg::BASELINE));

    let lzw = IfdBuilder::gray_strip(8, 8).without(259).entry(259, SHORT, &[5]);
    let data = TiffBuilder::new().add_ifd(lzw).build();
    let report = decode_with(&data, "b.tif", &settings);
    assert_eq!(
        report.sorted_error_warning_keys(),
        vec![msg::BASELINE_COMPRESSION]
    );
}

#[test]
fn test_identify_mode_skips_checks() {
    let settings = DecoderSettings {
        mode: ProcessMode::Identify,
        ..DecoderSettings::default()
    };
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::gray_strip(8, 8).without(262))
        .build();
    let report = decode_with(&data, "c.tif", &settings);
    assert_eq!(report.format, Some("TIFF"));
    assert!(report.is_ok());
}
