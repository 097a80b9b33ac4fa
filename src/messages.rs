//! Diagnostic message keys and their human-readable templates.
//!
//! Decoders identify every diagnostic by a stable key (compared by the
//! golden-file tests) and render the text shown to users through the narrow
//! [`MessageCatalog`] interface. Templates use positional placeholders
//! `{0}`, `{1}`, ... that are substituted with the supplied arguments.

use std::collections::HashMap;
use std::fmt::{self, Display, Write};

// =============================================================================
// MessageCatalog
// =============================================================================

/// Lookup of message templates by key.
pub trait MessageCatalog: Send + Sync + fmt::Debug {
    /// Template registered for `key`, if any.
    fn template(&self, key: &str) -> Option<&str>;

    /// Whether a template exists for `key`.
    fn has_msg(&self, key: &str) -> bool {
        self.template(key).is_some()
    }

    /// Render the template for `key` with positional arguments.
    ///
    /// Unknown keys render as the key followed by the arguments, so a missing
    /// template never hides a diagnostic.
    fn msg(&self, key: &str, args: &[&dyn Display]) -> String {
        match self.template(key) {
            Some(template) => render(template, args),
            None => {
                let mut out = key.to_string();
                for arg in args {
                    let _ = write!(out, " {}", arg);
                }
                out
            }
        }
    }
}

/// Substitute `{n}` placeholders in `template`.
///
/// Placeholders with an index past the end of `args`, and braces that do not
/// form a placeholder, are copied unchanged.
pub fn render(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after.find('}').and_then(|close| {
            after[..close]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map(|arg| (close, arg))
        });
        match placeholder {
            Some((close, arg)) => {
                let _ = write!(out, "{}", arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Built-in English messages.
#[derive(Debug, Clone)]
pub struct EnglishCatalog {
    templates: HashMap<&'static str, &'static str>,
}

impl EnglishCatalog {
    pub fn new() -> Self {
        Self {
            templates: ENGLISH.iter().copied().collect(),
        }
    }
}

impl Default for EnglishCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCatalog for EnglishCatalog {
    fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).copied()
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Result status keys.
pub mod result {
    pub const OK: &str = "processor.result.ok";
    pub const WARN: &str = "processor.result.warn";
    pub const ERROR: &str = "processor.result.error";
}

/// TIFF keys.
pub mod tiff {
    pub const CANNOT_READ_GLOBAL_HEADER: &str = "tiff.error.cannot_read_global_header";
    pub const INVALID_BYTE_ORDER: &str = "tiff.error.invalid_byte_order";
    pub const INVALID_VERSION: &str = "tiff.error.invalid_version";
    pub const INVALID_BIG_TIFF_OFFSET_SIZE: &str = "tiff.error.invalid_big_tiff_offset_size";
    pub const INVALID_BIG_TIFF_OFFSET_ZERO: &str = "tiff.error.invalid_big_tiff_offset_zero";
    pub const INVALID_FILE_OFFSET: &str = "tiff.error.invalid_file_offset";
    pub const READING_ERROR: &str = "tiff.error.reading_error";
    pub const IMAGE_FILE_DIRECTORY_REPEATED: &str = "tiff.error.image_file_directory_repeated";
    pub const TOO_FEW_TAGS: &str = "tiff.error.too_few_tags";
    pub const IMAGE_FILE_DIRECTORY_NESTING: &str = "tiff.error.image_file_directory_nesting_too_deep";
    pub const UNKNOWN_FIELD_TYPE: &str = "tiff.error.unknown_field_type";
    pub const INVALID_FIELD_OFFSET_AND_SIZE: &str = "tiff.error.invalid_field_offset_and_size";
    pub const FIELD_DATA_TOO_LARGE: &str = "tiff.error.field_data_too_large";
    pub const FIELD_DATA_BUDGET_EXHAUSTED: &str = "tiff.error.field_data_budget_exhausted";
    pub const ODD_FIELD_OFFSET: &str = "tiff.warn.odd_field_offset";
    pub const ODD_IMAGE_FILE_DIRECTORY_OFFSET: &str = "tiff.warn.odd_image_file_directory_offset";
    pub const DENOMINATOR_ZERO: &str = "tiff.error.denominator_zero";
    pub const INCORRECT_FIELD_TYPE: &str = "tiff.error.incorrect_field_type";
    pub const VALUE_SMALLER_THAN_MINIMUM: &str = "tiff.error.value_smaller_than_minimum";
    pub const VALUE_LARGER_THAN_MAXIMUM: &str = "tiff.error.value_larger_than_maximum";
    pub const FIELD_HAS_TOO_FEW_VALUES: &str = "tiff.error.field_has_too_few_values";
    pub const FIELD_HAS_TOO_MANY_VALUES: &str = "tiff.error.field_has_too_many_values";
    pub const NON_ASCII_CHARACTERS: &str = "tiff.error.non_ascii_characters";
    pub const CHARACTERS_NOT_ZERO_TERMINATED: &str = "tiff.error.characters_not_zero_terminated";
    pub const INVALID_DATE_TIME: &str = "tiff.error.invalid_date_time";
    pub const ENTRIES_ORDER: &str = "tiff.error.image_file_directory_entries_order";
    pub const MISSING_MANDATORY_FIELD: &str = "tiff.error.missing_mandatory_field";
    pub const NO_STRIP_OR_TILE_FIELDS: &str = "tiff.error.no_strip_or_tile_fields";
    pub const SOME_TILE_FIELDS_MISSING: &str = "tiff.error.some_tile_fields_missing";
    pub const STRIP_AND_TILE_FIELDS: &str = "tiff.error.strip_and_tile_fields";
    pub const ONLY_SOME_STRIP_FIELDS: &str = "tiff.error.only_some_strip_fields";
    pub const STRIP_OFFSETS_AND_BYTE_COUNTS_DIFFER: &str =
        "tiff.error.number_of_strip_offsets_and_byte_counts_differ";
    pub const UNEXPECTED_NUMBER_OF_STRIPS: &str = "tiff.error.unexpected_number_of_strips";
    pub const TILE_WIDTH_NOT_MULTIPLE_OF_16: &str = "tiff.error.tile_width_not_multiple_of_16";
    pub const TILE_LENGTH_NOT_MULTIPLE_OF_16: &str = "tiff.error.tile_length_not_multiple_of_16";
    pub const TILE_OFFSETS_AND_BYTE_COUNTS_DIFFER: &str =
        "tiff.error.number_of_tile_offsets_and_byte_counts_differ";
    pub const UNEXPECTED_NUMBER_OF_TILES: &str = "tiff.error.unexpected_number_of_tiles";
    pub const IMAGE_DATA_OFFSET_AND_SIZE: &str = "tiff.error.image_data_offset_and_size";
    pub const UNEXPECTED_NUMBER_OF_SAMPLES: &str = "tiff.error.unexpected_number_of_samples";
    pub const JPEG_INTERCHANGE_FORMAT_OFFSET_AND_SIZE: &str =
        "tiff.error.jpeg_interchange_format_offset_and_size";
    pub const BASELINE: &str = "tiff.info.baseline";
    pub const BASELINE_TAG_NOT_ALLOWED: &str = "tiff.error.baseline.tag_not_allowed";
    pub const BASELINE_COMPRESSION: &str = "tiff.error.baseline.compression";
    pub const BASELINE_PHOTOMETRIC_INTERPRETATION: &str =
        "tiff.error.baseline.photometric_interpretation";
    pub const BASELINE_BITS_PER_SAMPLE: &str = "tiff.error.baseline.bits_per_sample";
}

/// XMP keys.
pub mod xmp {
    pub const UNABLE_TO_FIND_XPACKET: &str = "xmp.error.unable_to_find_xpacket";
    pub const MISSING_XPACKET_END: &str = "xmp.warn.missing_xpacket_end";
}

/// JPEG keys.
pub mod jpeg {
    pub const CANNOT_READ_HEADER: &str = "jpeg.error.cannot_read_header";
    pub const READING_ERROR: &str = "jpeg.error.reading_error";
    pub const INVALID_MARKER: &str = "jpeg.error.invalid_marker";
    pub const INVALID_MARKER_LENGTH: &str = "jpeg.error.invalid_marker_length";
    pub const FIRST_MARKER_NOT_SOI: &str = "jpeg.error.first_marker_not_soi";
    pub const SOI_FIRST_MARKER_ONLY: &str = "jpeg.error.soi_first_marker_only";
    pub const EXTRANEOUS_DATA_AFTER_END_OF_STREAM: &str =
        "jpeg.warn.extraneous_data_after_end_of_stream";
    pub const UNEXPECTED_END_OF_INPUT: &str = "jpeg.error.unexpected_end_of_input";

    pub const INVALID_SAMPLE_PRECISION_BASELINE: &str =
        "jpeg.error.invalid_sample_precision_baseline";
    pub const INVALID_SAMPLE_PRECISION_EXTENDED: &str =
        "jpeg.error.invalid_sample_precision_extended";
    pub const INVALID_SAMPLE_PRECISION_PROGRESSIVE: &str =
        "jpeg.error.invalid_sample_precision_progressive";
    pub const INVALID_SAMPLE_PRECISION_LOSSLESS: &str =
        "jpeg.error.invalid_sample_precision_lossless";
    pub const MULTIPLE_FRAMES: &str = "jpeg.error.multiple_frames";
    pub const WIDTH_ZERO: &str = "jpeg.error.width_zero";
    pub const AT_LEAST_ONE_COMPONENT: &str = "jpeg.error.at_least_one_component";
    pub const PROGRESSIVE_TOO_MANY_COMPONENTS: &str =
        "jpeg.error.progressive_invalid_number_of_components";
    pub const INVALID_FRAME_LENGTH: &str = "jpeg.error.invalid_frame_length";
    pub const FRAME_LENGTH_TOO_SMALL: &str = "jpeg.error.frame_length_too_small";
    pub const INVALID_HORIZONTAL_SAMPLING_FACTOR: &str =
        "jpeg.error.invalid_horizontal_component_sampling_factor";
    pub const INVALID_VERTICAL_SAMPLING_FACTOR: &str =
        "jpeg.error.invalid_vertical_component_sampling_factor";
    pub const INVALID_QUANTIZATION_TABLE: &str = "jpeg.error.invalid_quantization_table";
    pub const DUPLICATE_FRAME_COMPONENT: &str = "jpeg.error.duplicate_frame_component";

    pub const SCAN_BEFORE_FRAME: &str = "jpeg.error.scan_before_frame";
    pub const INVALID_NUMBER_OF_SCAN_COMPONENTS: &str =
        "jpeg.error.invalid_number_of_scan_components";
    pub const INVALID_SCAN_MARKER_LENGTH: &str = "jpeg.error.invalid_scan_marker_length";
    pub const SCAN_COMPONENT_TWICE: &str = "jpeg.error.scan_component_twice";
    pub const SCAN_COMPONENT_UNDEFINED: &str = "jpeg.error.scan_component_undefined";
    pub const INVALID_SEQUENTIAL_SCAN_PARAMETERS: &str =
        "jpeg.error.invalid_sequential_scan_parameters";

    pub const INVALID_HUFFMAN_TABLE_CLASS: &str = "jpeg.error.invalid_huffman_table_class";
    pub const INVALID_HUFFMAN_TABLE_DESTINATION: &str =
        "jpeg.error.invalid_huffman_table_destination";
    pub const HUFFMAN_TABLE_TOO_SHORT: &str = "jpeg.error.huffman_table_too_short";
    pub const TOO_MANY_HUFFMAN_CODES: &str = "jpeg.error.too_many_huffman_codes";
    pub const INVALID_HUFFMAN_CODE_LENGTHS: &str = "jpeg.error.invalid_huffman_code_lengths";
    pub const INVALID_QUANTIZATION_TABLE_DESTINATION: &str =
        "jpeg.error.invalid_quantization_table_destination";
    pub const INVALID_QUANTIZATION_TABLE_PRECISION: &str =
        "jpeg.error.invalid_quantization_table_precision";
    pub const NOT_ENOUGH_DATA_FOR_QUANTIZATION_TABLE: &str =
        "jpeg.error.not_enough_data_for_quantization_table";
    pub const INVALID_RESTART_INTERVAL_LENGTH: &str = "jpeg.error.invalid_restart_interval_length";

    pub const UNDEFINED_HUFFMAN_TABLE: &str = "jpeg.error.undefined_huffman_table";
    pub const INVALID_HUFFMAN_CODE: &str = "jpeg.error.invalid_huffman_code";
    pub const AC_COEFFICIENT_OVERFLOW: &str = "jpeg.error.ac_coefficient_overflow";
    pub const UNEXPECTED_RESTART_MARKER: &str = "jpeg.error.unexpected_restart_marker";
    pub const MISSING_RESTART_MARKER: &str = "jpeg.error.missing_restart_marker";
    pub const PREMATURE_END_OF_SCAN_DATA: &str = "jpeg.error.premature_end_of_scan_data";
}

// =============================================================================
// English templates
// =============================================================================

const ENGLISH: &[(&str, &str)] = &[
    (result::OK, "OK"),
    (result::WARN, "Warning"),
    (result::ERROR, "Error"),
    // TIFF
    (tiff::CANNOT_READ_GLOBAL_HEADER, "Cannot read TIFF header: {0}."),
    (tiff::INVALID_BYTE_ORDER, "Invalid byte order signature {0}; expected II or MM."),
    (tiff::INVALID_VERSION, "Invalid TIFF version {0}; expected 42 or 43."),
    (tiff::INVALID_BIG_TIFF_OFFSET_SIZE, "Invalid BigTIFF offset size {0}; expected 8."),
    (tiff::INVALID_BIG_TIFF_OFFSET_ZERO, "BigTIFF header field after the offset size must be 0, found {0}."),
    (tiff::INVALID_FILE_OFFSET, "Image file directory offset {0} lies outside of the file (length {1})."),
    (tiff::READING_ERROR, "Read error: {0}."),
    (tiff::IMAGE_FILE_DIRECTORY_REPEATED, "Image file directory offset {0} was already visited."),
    (tiff::TOO_FEW_TAGS, "Image file directory at offset {0} has {1} tags; at least {2} required."),
    (tiff::IMAGE_FILE_DIRECTORY_NESTING, "Image file directory at offset {0} is nested more than {1} levels deep."),
    (tiff::UNKNOWN_FIELD_TYPE, "Tag {0} has unknown field type {1}."),
    (tiff::INVALID_FIELD_OFFSET_AND_SIZE, "Data of tag {0} at offset {1} with {2} bytes lies outside of the file (length {3})."),
    (tiff::FIELD_DATA_TOO_LARGE, "Tag {0} needs {1} bytes once decoded; at most {2} are allowed per field."),
    (tiff::FIELD_DATA_BUDGET_EXHAUSTED, "Tag {0} needs {1} bytes once decoded; only {2} of the {3} bytes allowed per file remain."),
    (tiff::ODD_FIELD_OFFSET, "Data of tag {0} starts at odd offset {1}."),
    (tiff::ODD_IMAGE_FILE_DIRECTORY_OFFSET, "Image file directory starts at odd offset {0}."),
    (tiff::DENOMINATOR_ZERO, "Tag {0} has rational value {1}/0."),
    (tiff::INCORRECT_FIELD_TYPE, "Tag {0} ({1}) has field type {2}; allowed: {3}."),
    (tiff::VALUE_SMALLER_THAN_MINIMUM, "Tag {0} ({1}) value {2} is smaller than minimum {3}."),
    (tiff::VALUE_LARGER_THAN_MAXIMUM, "Tag {0} ({1}) value {2} is larger than maximum {3}."),
    (tiff::FIELD_HAS_TOO_FEW_VALUES, "Tag {0} ({1}) has {2} values; at least {3} required."),
    (tiff::FIELD_HAS_TOO_MANY_VALUES, "Tag {0} ({1}) has {2} values; at most {3} allowed."),
    (tiff::NON_ASCII_CHARACTERS, "Tag {0} ({1}) contains {2} non-ASCII characters."),
    (tiff::CHARACTERS_NOT_ZERO_TERMINATED, "Tag {0} ({1}) is not terminated by a zero byte."),
    (tiff::INVALID_DATE_TIME, "Tag {0} ({1}) value \"{2}\" is not a valid date and time."),
    (tiff::ENTRIES_ORDER, "Tag {0} follows tag {1}; tags must be sorted in ascending order."),
    (tiff::MISSING_MANDATORY_FIELD, "Image file directory {0} lacks mandatory tag {1} ({2})."),
    (tiff::NO_STRIP_OR_TILE_FIELDS, "Image file directory {0} has neither strip nor tile fields."),
    (tiff::SOME_TILE_FIELDS_MISSING, "Image file directory {0} has only some of the tile fields."),
    (tiff::STRIP_AND_TILE_FIELDS, "Image file directory {0} has both strip and tile fields."),
    (tiff::ONLY_SOME_STRIP_FIELDS, "Image file directory {0} has only some of the strip fields."),
    (tiff::STRIP_OFFSETS_AND_BYTE_COUNTS_DIFFER, "Image file directory {0} has {1} strip offsets but {2} strip byte counts."),
    (tiff::UNEXPECTED_NUMBER_OF_STRIPS, "Image file directory {0} has {1} strips; {2} expected."),
    (tiff::TILE_WIDTH_NOT_MULTIPLE_OF_16, "Image file directory {0} tile width {1} is not a multiple of 16."),
    (tiff::TILE_LENGTH_NOT_MULTIPLE_OF_16, "Image file directory {0} tile length {1} is not a multiple of 16."),
    (tiff::TILE_OFFSETS_AND_BYTE_COUNTS_DIFFER, "Image file directory {0} has {1} tile offsets but {2} tile byte counts."),
    (tiff::UNEXPECTED_NUMBER_OF_TILES, "Image file directory {0} has {1} tiles; {2} expected."),
    (tiff::IMAGE_DATA_OFFSET_AND_SIZE, "Image data block {1} of directory {0} at offset {2} with {3} bytes lies outside of the file."),
    (tiff::UNEXPECTED_NUMBER_OF_SAMPLES, "Image file directory {0} declares {1} samples per pixel; {2} expected."),
    (tiff::JPEG_INTERCHANGE_FORMAT_OFFSET_AND_SIZE, "Embedded JPEG at offset {0} with {1} bytes lies outside of the file."),
    (tiff::BASELINE, "First image file directory conforms to the TIFF baseline profile."),
    (tiff::BASELINE_TAG_NOT_ALLOWED, "Tag {0} is not part of the TIFF baseline profile."),
    (tiff::BASELINE_COMPRESSION, "Compression {0} is not allowed in baseline TIFF."),
    (tiff::BASELINE_PHOTOMETRIC_INTERPRETATION, "Photometric interpretation {0} is not allowed in baseline TIFF."),
    (tiff::BASELINE_BITS_PER_SAMPLE, "Bits per sample {0} is not allowed with photometric interpretation {1} in baseline TIFF."),
    // XMP
    (xmp::UNABLE_TO_FIND_XPACKET, "XMP data does not contain an xpacket header."),
    (xmp::MISSING_XPACKET_END, "XMP packet has no xpacket trailer."),
    // JPEG
    (jpeg::CANNOT_READ_HEADER, "Cannot read JPEG header: {0}."),
    (jpeg::READING_ERROR, "Read error: {0}."),
    (jpeg::INVALID_MARKER, "Invalid marker {0} at offset {1}."),
    (jpeg::INVALID_MARKER_LENGTH, "Marker {0} at offset {1} has invalid length {2}."),
    (jpeg::FIRST_MARKER_NOT_SOI, "First marker is {0}; expected start of image."),
    (jpeg::SOI_FIRST_MARKER_ONLY, "Start of image marker at offset {0}; it is only allowed as first marker."),
    (jpeg::EXTRANEOUS_DATA_AFTER_END_OF_STREAM, "End of image at offset {0} is followed by data; file length is {1}."),
    (jpeg::UNEXPECTED_END_OF_INPUT, "Unexpected end of input: {1} bytes needed at offset {0}; file length is {2}."),
    (jpeg::INVALID_SAMPLE_PRECISION_BASELINE, "Baseline frame sample precision {0}; must be 8."),
    (jpeg::INVALID_SAMPLE_PRECISION_EXTENDED, "Extended frame sample precision {0}; must be 8 or 12."),
    (jpeg::INVALID_SAMPLE_PRECISION_PROGRESSIVE, "Progressive frame sample precision {0}; must be 8 or 12."),
    (jpeg::INVALID_SAMPLE_PRECISION_LOSSLESS, "Lossless frame sample precision {0}; must be 2 to 16."),
    (jpeg::MULTIPLE_FRAMES, "More than one start of frame marker."),
    (jpeg::WIDTH_ZERO, "Frame width is zero."),
    (jpeg::AT_LEAST_ONE_COMPONENT, "Frame must have at least one component."),
    (jpeg::PROGRESSIVE_TOO_MANY_COMPONENTS, "Progressive frame has {0} components; at most 4 allowed."),
    (jpeg::INVALID_FRAME_LENGTH, "Frame with {0} components must have length {1}, found {2}."),
    (jpeg::FRAME_LENGTH_TOO_SMALL, "Frame length {0} is smaller than minimum {1}."),
    (jpeg::INVALID_HORIZONTAL_SAMPLING_FACTOR, "Horizontal sampling factor {0} of component {1} not in {2}..{3}."),
    (jpeg::INVALID_VERTICAL_SAMPLING_FACTOR, "Vertical sampling factor {0} of component {1} not in {2}..{3}."),
    (jpeg::INVALID_QUANTIZATION_TABLE, "Component {0} references quantization table {1}; maximum is {2}."),
    (jpeg::DUPLICATE_FRAME_COMPONENT, "Frame component {0} is defined more than once."),
    (jpeg::SCAN_BEFORE_FRAME, "Start of scan before start of frame."),
    (jpeg::INVALID_NUMBER_OF_SCAN_COMPONENTS, "Scan has {0} components; must be {1} to {2}."),
    (jpeg::INVALID_SCAN_MARKER_LENGTH, "Scan with {0} components must have length {1}, found {2}."),
    (jpeg::SCAN_COMPONENT_TWICE, "Scan component {0} is listed more than once."),
    (jpeg::SCAN_COMPONENT_UNDEFINED, "Scan component {0} is not defined in the frame."),
    (jpeg::INVALID_SEQUENTIAL_SCAN_PARAMETERS, "Sequential scan has spectral selection {0}..{1} and approximation {2}/{3}; expected 0..63 and 0/0."),
    (jpeg::INVALID_HUFFMAN_TABLE_CLASS, "Huffman table class {0}; maximum is {1}."),
    (jpeg::INVALID_HUFFMAN_TABLE_DESTINATION, "Huffman table destination {0}; maximum is {1}."),
    (jpeg::HUFFMAN_TABLE_TOO_SHORT, "Huffman table definition needs {0} bytes; only {1} left."),
    (jpeg::TOO_MANY_HUFFMAN_CODES, "Huffman table declares {0} codes; at most 256 allowed."),
    (jpeg::INVALID_HUFFMAN_CODE_LENGTHS, "Huffman code lengths overflow at length {0}."),
    (jpeg::INVALID_QUANTIZATION_TABLE_DESTINATION, "Quantization table destination {0}; maximum is {1}."),
    (jpeg::INVALID_QUANTIZATION_TABLE_PRECISION, "Quantization table precision {0}; must be 0 or 1."),
    (jpeg::NOT_ENOUGH_DATA_FOR_QUANTIZATION_TABLE, "Quantization table needs {1} bytes; only {0} left."),
    (jpeg::INVALID_RESTART_INTERVAL_LENGTH, "Restart interval marker length {0}; must be 4."),
    (jpeg::UNDEFINED_HUFFMAN_TABLE, "Scan component {0} references undefined {1} Huffman table {2}."),
    (jpeg::INVALID_HUFFMAN_CODE, "Invalid Huffman code in MCU {0} of scan {1}."),
    (jpeg::AC_COEFFICIENT_OVERFLOW, "AC coefficients exceed block size in MCU {0} of scan {1}."),
    (jpeg::UNEXPECTED_RESTART_MARKER, "Restart marker RST{0} at offset {1}; expected RST{2}."),
    (jpeg::MISSING_RESTART_MARKER, "Restart marker RST{0} expected at offset {1}."),
    (jpeg::PREMATURE_END_OF_SCAN_DATA, "Scan {0} data ends after {1} of {2} MCUs."),
];
