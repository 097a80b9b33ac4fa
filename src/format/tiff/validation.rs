//! Field and directory validation.
//!
//! Field checks run on every entry as soon as it is decoded: type against
//! the schema, value range, value count, character data and date/time
//! layout. Directory checks run once the whole directory is loaded:
//! mandatory tags and sample count consistency. Strip and tile layout is
//! checked in [`super::image_data`].

use crate::diagnostics::Diagnostics;
use crate::messages::tiff as msg;

use super::datetime::is_valid_date_time;
use super::field::{Field, Value};
use super::ifd::ImageFileDirectory;
use super::schema::FieldSchema;
use super::tags::{photometric, FieldType, TiffTag};

/// Tags whose value must be a date/time string.
const DATE_TIME_TAGS: [TiffTag; 3] = [
    TiffTag::DateTime,
    TiffTag::DateTimeOriginal,
    TiffTag::DateTimeDigitized,
];

// =============================================================================
// Field validation
// =============================================================================

/// Check one decoded field against the schema.
pub fn validate_field(field: &Field, schema: &FieldSchema, diagnostics: &mut Diagnostics) {
    let Some(field_type) = field.field_type else {
        return;
    };

    if let Some(desc) = schema.get(field.tag) {
        let name = desc.name();
        if !desc.allows(field_type) {
            diagnostics.error(
                msg::INCORRECT_FIELD_TYPE,
                &[&field.tag, &name, &field_type, &desc.allowed_type_names()],
            );
            return;
        }

        for value in &field.values {
            let Value::Integer(v) = *value else {
                continue;
            };
            if let Some(min) = desc.min_value.filter(|&min| v < min) {
                diagnostics.error(msg::VALUE_SMALLER_THAN_MINIMUM, &[&field.tag, &name, &v, &min]);
            }
            if let Some(max) = desc.max_value.filter(|&max| v > max) {
                diagnostics.error(msg::VALUE_LARGER_THAN_MAXIMUM, &[&field.tag, &name, &v, &max]);
            }
        }

        if field.count < desc.min_count {
            diagnostics.error(
                msg::FIELD_HAS_TOO_FEW_VALUES,
                &[&field.tag, &name, &field.count, &desc.min_count],
            );
        }
        if field.count > desc.max_count {
            diagnostics.error(
                msg::FIELD_HAS_TOO_MANY_VALUES,
                &[&field.tag, &name, &field.count, &desc.max_count],
            );
        }
    }

    if field_type == FieldType::Ascii {
        validate_characters(field, diagnostics);
        if DATE_TIME_TAGS.iter().any(|t| t.as_u16() == field.tag) {
            validate_date_time(field, diagnostics);
        }
    }
}

/// All bytes but the last must be ASCII; the last must be zero.
fn validate_characters(field: &Field, diagnostics: &mut Diagnostics) {
    let Some((&last, body)) = field.raw.split_last() else {
        return;
    };
    let non_ascii = body.iter().filter(|b| !b.is_ascii()).count();
    if non_ascii > 0 {
        diagnostics.error(
            msg::NON_ASCII_CHARACTERS,
            &[&field.tag, &field.name(), &non_ascii],
        );
    }
    if last != 0 {
        diagnostics.error(msg::CHARACTERS_NOT_ZERO_TERMINATED, &[&field.tag, &field.name()]);
    }
}

fn validate_date_time(field: &Field, diagnostics: &mut Diagnostics) {
    if field.raw.is_empty() {
        return;
    }
    let value = field.as_string();
    if !is_valid_date_time(&value) {
        diagnostics.error(msg::INVALID_DATE_TIME, &[&field.tag, &field.name(), &value]);
    }
}

/// Entries must be sorted by strictly ascending tag.
pub fn validate_entry_order(previous: Option<u16>, tag: u16, diagnostics: &mut Diagnostics) {
    if let Some(previous) = previous.filter(|&p| p >= tag) {
        diagnostics.error(msg::ENTRIES_ORDER, &[&tag, &previous]);
    }
}

// =============================================================================
// Directory validation
// =============================================================================

/// Every mandatory schema tag must be present.
pub fn validate_mandatory(
    ifd: &ImageFileDirectory,
    index: usize,
    schema: &FieldSchema,
    diagnostics: &mut Diagnostics,
) {
    for desc in schema.mandatory() {
        if !ifd.contains(desc.tag_id()) {
            diagnostics.error(
                msg::MISSING_MANDATORY_FIELD,
                &[&index, &desc.tag_id(), &desc.name()],
            );
        }
    }
}

/// Samples per pixel must equal the photometric color samples plus extra
/// samples.
///
/// Directories without a photometric interpretation, or with one whose
/// sample count is not fixed (e.g. color filter arrays), are not checked.
pub fn validate_samples(ifd: &ImageFileDirectory, index: usize, diagnostics: &mut Diagnostics) {
    let Some(color) = ifd
        .value_u64(TiffTag::PhotometricInterpretation)
        .and_then(photometric::samples)
    else {
        return;
    };
    let extra = ifd
        .find(TiffTag::ExtraSamples.as_u16())
        .map_or(0, |f| f.count);
    let declared = ifd.value_u64(TiffTag::SamplesPerPixel).unwrap_or(1);
    let expected = color.saturating_add(extra);
    if declared != expected {
        diagnostics.error(
            msg::UNEXPECTED_NUMBER_OF_SAMPLES,
            &[&index, &declared, &expected],
        );
    }
}
