//! Shared pieces of the image-based modules (breast, lung).

use crate::models::{CanonicalRecord, PredictionVerdict};
use crate::pipeline::report::{ReportLayout, ReportLine, SPACIOUS_LINE_PITCH};
use crate::pipeline::schema::{FieldSpec, FieldType};

const DETAIL_FONT_SIZE: f32 = 14.0;
const VERDICT_FONT_SIZE: f32 = 16.0;

pub const GENDER_CODES: &[&str] = &["M", "F"];

/// Demographic fields sent next to the image. Image modules have no
/// scraper path, so no vendor labels are declared.
pub(super) const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldType::Text, &[]),
    FieldSpec::new("age", "Age", FieldType::Number, &[]),
    FieldSpec::new("gender", "Gender", FieldType::Choice(GENDER_CODES), &[]),
];

/// Display form of a gender code: `M` is Male, anything else Female.
pub fn gender_label(code: &str) -> &'static str {
    if code == "M" {
        "Male"
    } else {
        "Female"
    }
}

/// Name, age, gender, then a classification sentence for `condition`.
pub(super) fn layout(
    record: &CanonicalRecord,
    verdict: &PredictionVerdict,
    gender: &str,
    condition: &str,
) -> ReportLayout {
    let sentence = if verdict.is_negative() {
        format!("The person is not suffering from {condition}.")
    } else {
        format!("The person is suffering from {condition}.")
    };
    let lines = vec![
        ReportLine::labeled("Name:", record.value("name"), DETAIL_FONT_SIZE),
        ReportLine::labeled("Age:", record.value("age"), DETAIL_FONT_SIZE),
        ReportLine::labeled("Gender:", gender, DETAIL_FONT_SIZE),
        ReportLine::labeled("Prediction Result:", &sentence, VERDICT_FONT_SIZE),
    ];
    ReportLayout::new(lines, SPACIOUS_LINE_PITCH)
}
