use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict};
use crate::pipeline::report::{ReportLayout, ReportLine, DENSE_LINE_PITCH};
use crate::pipeline::request::WireField;
use crate::pipeline::schema::{FieldSpec, FieldType};
use crate::pipeline::strategy::DiagnosticModule;

const FONT_SIZE: f32 = 12.0;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("age", "Age", FieldType::Number, &["Age"]),
    FieldSpec::new("sex", "Sex (0 - female, 1 - male)", FieldType::Number, &["Sex"]),
    FieldSpec::new(
        "chestPainType",
        "Chest Pain Type (1-Typical Angina, 2-Atypical Angina, 3-Non-anginal Pain, 4-Asymptomatic)",
        FieldType::Number,
        &["Chest pain type"],
    ),
    FieldSpec::new(
        "restingBloodPressure",
        "Resting Blood Pressure",
        FieldType::Number,
        &["Resting blood pressure"],
    ),
    FieldSpec::new(
        "serumCholesterol",
        "Serum Cholesterol",
        FieldType::Number,
        &["Serum cholesterol in mg/dl"],
    ),
    FieldSpec::new(
        "fastingBloodSugar",
        "Fasting Blood Sugar (0 or 1)",
        FieldType::Number,
        &["Fasting blood sugar > 120 mg/dl"],
    ),
    FieldSpec::new(
        "restingECG",
        "Resting ECG",
        FieldType::Number,
        &["Resting Electrocardiographic Results"],
    ),
    FieldSpec::new(
        "maxHeartRate",
        "Maximum Heart Rate Achieved",
        FieldType::Number,
        &["Maximum Heart Rate Achieved"],
    ),
    FieldSpec::new(
        "exerciseInducedAngina",
        "Exercise Induced Angina (0 or 1)",
        FieldType::Number,
        &["Exercise Induced Angina"],
    ),
    FieldSpec::new("oldPeak", "Old Peak", FieldType::Number, &["Old peak"]),
    FieldSpec::new(
        "slope",
        "Slope",
        FieldType::Number,
        &["Slope of the peak exercise ST Segment"],
    ),
    FieldSpec::new(
        "numMajorVessels",
        "Number of Major Vessels (0-3)",
        FieldType::Number,
        &["Number of major vessels (0-3) colored by fluoroscopy"],
    ),
    FieldSpec::new(
        "thal",
        "Thal (Thallium Stress Test Result)",
        FieldType::Number,
        &["Thal (Thallium Stress Test Result)"],
    ),
];

/// Positional order of the oracle's `p1..p13` parameters. The oracle has no
/// semantic names, so this order is the contract.
pub const PARAMETER_ORDER: [&str; 13] = [
    "age",
    "sex",
    "chestPainType",
    "restingBloodPressure",
    "serumCholesterol",
    "fastingBloodSugar",
    "restingECG",
    "maxHeartRate",
    "exerciseInducedAngina",
    "oldPeak",
    "slope",
    "numMajorVessels",
    "thal",
];

/// Report labels, paired with canonical names.
const REPORT_LABELS: [(&str, &str); 13] = [
    ("Age:", "age"),
    ("Sex:", "sex"),
    ("Chest Pain Type:", "chestPainType"),
    ("Resting Blood Pressure:", "restingBloodPressure"),
    ("Serum Cholesterol:", "serumCholesterol"),
    ("Fasting Blood Sugar:", "fastingBloodSugar"),
    ("Resting ECG:", "restingECG"),
    ("Maximum Heart Rate Achieved:", "maxHeartRate"),
    ("Exercise Induced Angina:", "exerciseInducedAngina"),
    ("Old Peak:", "oldPeak"),
    ("Slope:", "slope"),
    ("Number of Major Vessels (0-3):", "numMajorVessels"),
    ("Thal:", "thal"),
];

/// Heart disease: 13 clinical parameters, PDF scraping, positional wire names.
pub struct HeartModule;

impl DiagnosticModule for HeartModule {
    fn id(&self) -> ModuleId {
        ModuleId::Heart
    }

    fn modality(&self) -> Modality {
        Modality::Parameters
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn predict_path(&self) -> &'static str {
        "/api/v1/predict/heart-pred"
    }

    fn scrape_path(&self) -> Option<&'static str> {
        Some("/api/pdf/heart-scraper")
    }

    fn result_field(&self) -> &'static str {
        "result"
    }

    fn coerce_scraped(&self, field: &FieldSpec, raw: &str) -> String {
        if field.name == "fastingBloodSugar" {
            // Scrapers report the > 120 mg/dl test as Yes/No.
            return if raw.trim() == "Yes" { "1" } else { "0" }.to_string();
        }
        raw.trim().to_string()
    }

    fn wire_fields(&self, record: &CanonicalRecord) -> Vec<WireField> {
        PARAMETER_ORDER
            .iter()
            .enumerate()
            .map(|(i, name)| WireField::new(format!("p{}", i + 1), record.value(name)))
            .collect()
    }

    fn negative_markers(&self) -> &'static [&'static str] {
        &["not suffering"]
    }

    fn report_layout(
        &self,
        record: &CanonicalRecord,
        verdict: &PredictionVerdict,
    ) -> ReportLayout {
        let mut lines: Vec<ReportLine> = REPORT_LABELS
            .iter()
            .map(|(label, name)| ReportLine::labeled(label, record.value(name), FONT_SIZE))
            .collect();
        lines.push(ReportLine::labeled("Prediction Result:", &verdict.text, FONT_SIZE));
        ReportLayout::new(lines, DENSE_LINE_PITCH)
    }

    fn report_file_name(&self) -> &'static str {
        "Heart_Disease_Pred_Result.pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerdictClass;

    fn record_with(values: &[(&str, &str)]) -> CanonicalRecord {
        let mut record = CanonicalRecord::empty(&HeartModule.schema());
        for (name, value) in values {
            assert!(record.set(name, *value));
        }
        record
    }

    #[test]
    fn schema_has_thirteen_required_fields() {
        let schema = HeartModule.schema();
        assert_eq!(schema.len(), 13);
        assert!(schema.fields.iter().all(|f| f.required));
    }

    #[test]
    fn parameter_order_covers_schema() {
        let schema = HeartModule.schema();
        let names: Vec<&str> = schema.names().collect();
        assert_eq!(names, PARAMETER_ORDER.to_vec());
    }

    #[test]
    fn fasting_blood_sugar_coercion() {
        let field = HeartModule.schema().field("fastingBloodSugar").unwrap().clone();
        assert_eq!(HeartModule.coerce_scraped(&field, "Yes"), "1");
        assert_eq!(HeartModule.coerce_scraped(&field, " Yes "), "1");
        assert_eq!(HeartModule.coerce_scraped(&field, "No"), "0");
        assert_eq!(HeartModule.coerce_scraped(&field, "yes"), "0");
        assert_eq!(HeartModule.coerce_scraped(&field, "1"), "0");
    }

    #[test]
    fn other_fields_pass_through_trimmed() {
        let field = HeartModule.schema().field("age").unwrap().clone();
        assert_eq!(HeartModule.coerce_scraped(&field, " 63 "), "63");
    }

    #[test]
    fn wire_fields_are_positional() {
        let record = record_with(&[("age", "63"), ("thal", "3"), ("sex", "1")]);
        let wire = HeartModule.wire_fields(&record);
        assert_eq!(wire.len(), 13);
        assert_eq!(wire[0].name, "p1");
        assert_eq!(wire[0].value, "63");
        assert_eq!(wire[1].name, "p2");
        assert_eq!(wire[1].value, "1");
        assert_eq!(wire[12].name, "p13");
        assert_eq!(wire[12].value, "3");
    }

    #[test]
    fn report_embeds_raw_verdict_last() {
        let record = record_with(&[("age", "63")]);
        let verdict = PredictionVerdict {
            module: ModuleId::Heart,
            text: "The person is suffering from heart disease".into(),
            class: VerdictClass::Positive,
        };
        let layout = HeartModule.report_layout(&record, &verdict);
        assert_eq!(layout.lines.len(), 14);
        assert_eq!(layout.lines[0].text, "Age: 63");
        assert_eq!(
            layout.lines[13].text,
            "Prediction Result: The person is suffering from heart disease"
        );
        assert!((layout.line_pitch - 20.0).abs() < f32::EPSILON);
    }
}
