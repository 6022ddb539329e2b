use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict};
use crate::pipeline::report::ReportLayout;
use crate::pipeline::schema::FieldSpec;
use crate::pipeline::strategy::DiagnosticModule;

use super::imaging;

/// Breast cancer: X-ray image plus name, age, gender.
pub struct BreastModule;

impl DiagnosticModule for BreastModule {
    fn id(&self) -> ModuleId {
        ModuleId::Breast
    }

    fn modality(&self) -> Modality {
        Modality::Image
    }

    fn fields(&self) -> &'static [FieldSpec] {
        imaging::FIELDS
    }

    fn predict_path(&self) -> &'static str {
        "/api/v1/predict/breast-pred"
    }

    fn result_field(&self) -> &'static str {
        "prediction"
    }

    fn negative_markers(&self) -> &'static [&'static str] {
        &["not suffering"]
    }

    fn report_layout(
        &self,
        record: &CanonicalRecord,
        verdict: &PredictionVerdict,
    ) -> ReportLayout {
        let gender = imaging::gender_label(record.value("gender"));
        imaging::layout(record, verdict, gender, "Breast Cancer")
    }

    fn report_file_name(&self) -> &'static str {
        "breast_cancer_report.pdf"
    }
}
