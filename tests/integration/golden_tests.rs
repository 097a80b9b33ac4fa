//! Golden-file test: every row of `tests/fixtures/test-cases.tsv` names a
//! synthetic fixture, the expected result text and the sorted, comma-joined
//! keys of its warnings and errors.

use imgcheck::diagnostics::ResultStatus;

use super::test_utils::*;

const TEST_CASES: &str = include_str!("../fixtures/test-cases.tsv");

/// Bytes of the fixture called `name`.
fn fixture(name: &str) -> Vec<u8> {
    match name {
        "strip-le.tif" => create_strip_tiff(),
        "strip-be.tif" => TiffBuilder::new()
            .with_byte_order(ByteOrderType::BigEndian)
            .add_ifd(IfdBuilder::gray_strip(8, 4))
            .build(),
        "bigtiff.tif" => TiffBuilder::new()
            .with_bigtiff(true)
            .add_ifd(IfdBuilder::gray_strip(8, 4))
            .build(),
        "camera.dng" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4).bytes(50706, BYTE, &[1, 4, 0, 0]))
            .build(),
        "thumbnail.tif" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4))
            .add_ifd(IfdBuilder::new().with_jpeg(create_test_jpeg()))
            .build(),
        "no-photometric.tif" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4).without(262))
            .build(),
        "no-strips.tif" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4).without(273).without(278))
            .build(),
        "bad-date.tif" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4).ascii(306, "2023-01-01 10:00:00"))
            .build(),
        "xmp-no-end.tif" => TiffBuilder::new()
            .add_ifd(IfdBuilder::gray_strip(8, 4).bytes(700, BYTE, b"<?xpacket begin=\"\"?>"))
            .build(),
        "bad-version.tif" => {
            let mut data = create_strip_tiff();
            data[2] = 0;
            data
        }
        "baseline.jpg" => create_test_jpeg(),
        "progressive.jpg" => create_progressive_jpeg(),
        "restart.jpg" => baseline_jpeg(16, 8, Some(1), &[0x3F, 0xFF, 0xD0, 0x3F]),
        "trailing.jpg" => {
            let mut data = create_test_jpeg();
            data.extend_from_slice(&[0; 16]);
            data
        }
        "no-eoi.jpg" => {
            let mut data = create_test_jpeg();
            data.truncate(data.len() - 2);
            data
        }
        "double-soi.jpg" => vec![0xFF, 0xD8, 0xFF, 0xD8],
        "short-scan.jpg" => baseline_jpeg(32, 32, None, &[0x00]),
        "empty.bin" => Vec::new(),
        other => panic!("no fixture named {other}"),
    }
}

#[test]
fn test_golden_cases() {
    let mut checked = 0;
    for (line_number, line) in TEST_CASES.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        assert_eq!(columns.len(), 3, "line {}: {line:?}", line_number + 1);
        let (name, expected_result, expected_keys) = (columns[0], columns[1], columns[2]);
        let expected_status = ResultStatus::from_name(expected_result)
            .unwrap_or_else(|| panic!("{name}: bad result {expected_result:?}"));

        let report = decode_with(&fixture(name), name, &Default::default());
        assert_eq!(report.status, expected_status, "{name}: {}", report.formatted_events);
        assert_eq!(
            report.sorted_error_warning_keys().join(","),
            expected_keys,
            "{name}"
        );
        checked += 1;
    }
    assert!(checked > 0);
}
