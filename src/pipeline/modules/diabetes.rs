use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict};
use crate::pipeline::report::{ReportLayout, ReportLine, DENSE_LINE_PITCH};
use crate::pipeline::schema::{FieldSpec, FieldType};
use crate::pipeline::strategy::DiagnosticModule;

const FONT_SIZE: f32 = 12.0;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("pregnancies", "Number of Pregnancies", FieldType::Number, &["Pregnancies"]),
    FieldSpec::new("glucose", "Glucose Level", FieldType::Number, &["Glucose"]),
    FieldSpec::new("bloodPressure", "Blood Pressure", FieldType::Number, &["BloodPressure"]),
    FieldSpec::new("skinThickness", "Skin Thickness", FieldType::Number, &["SkinThickness"]),
    FieldSpec::new("insulin", "Insulin", FieldType::Number, &["Insulin"]),
    FieldSpec::new("bmi", "BMI (Body Index Mass)", FieldType::Number, &["BMI"]),
    FieldSpec::new(
        "diabetesPedigreeFunction",
        "Diabetes Pedigree Function",
        FieldType::Number,
        &["DiabetesPedigreeFunction"],
    ),
    FieldSpec::new("age", "Age", FieldType::Number, &["Age"]),
];

const REPORT_LABELS: [(&str, &str); 8] = [
    ("Number of Pregnancies:", "pregnancies"),
    ("Glucose Level:", "glucose"),
    ("Blood Pressure:", "bloodPressure"),
    ("Skin Thickness:", "skinThickness"),
    ("Insulin:", "insulin"),
    ("BMI (Body Index Mass):", "bmi"),
    ("Diabetes Pedigree Function:", "diabetesPedigreeFunction"),
    ("Age:", "age"),
];

/// Diabetes: eight numeric parameters sent under their canonical names.
pub struct DiabetesModule;

impl DiagnosticModule for DiabetesModule {
    fn id(&self) -> ModuleId {
        ModuleId::Diabetes
    }

    fn modality(&self) -> Modality {
        Modality::Parameters
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn predict_path(&self) -> &'static str {
        "/api/v1/predict/diabetes-pred"
    }

    fn scrape_path(&self) -> Option<&'static str> {
        Some("/api/pdf/diabetes-scraper")
    }

    fn result_field(&self) -> &'static str {
        "result"
    }

    fn negative_markers(&self) -> &'static [&'static str] {
        &["not"]
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
        "Diabetes_Pred_Result.pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerdictClass;

    #[test]
    fn schema_field_order() {
        let names: Vec<&str> = DiabetesModule.schema().names().collect();
        assert_eq!(
            names,
            vec![
                "pregnancies",
                "glucose",
                "bloodPressure",
                "skinThickness",
                "insulin",
                "bmi",
                "diabetesPedigreeFunction",
                "age",
            ]
        );
    }

    #[test]
    fn wire_fields_use_canonical_names() {
        let mut record = CanonicalRecord::empty(&DiabetesModule.schema());
        record.set("glucose", "148");
        let wire = DiabetesModule.wire_fields(&record);
        assert_eq!(wire.len(), 8);
        assert_eq!(wire[1].name, "glucose");
        assert_eq!(wire[1].value, "148");
    }

    #[test]
    fn report_lists_parameters_then_verdict() {
        let mut record = CanonicalRecord::empty(&DiabetesModule.schema());
        record.set("bmi", "33.6");
        let verdict = PredictionVerdict {
            module: ModuleId::Diabetes,
            text: "You are not diabetic".into(),
            class: VerdictClass::Negative,
        };
        let layout = DiabetesModule.report_layout(&record, &verdict);
        assert_eq!(layout.lines.len(), 9);
        assert_eq!(layout.lines[5].text, "BMI (Body Index Mass): 33.6");
        assert_eq!(layout.lines[8].text, "Prediction Result: You are not diabetic");
        assert!(layout.lines.iter().all(|l| (l.font_size - 12.0).abs() < f32::EPSILON));
    }
}
