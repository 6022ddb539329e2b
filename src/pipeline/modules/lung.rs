use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict};
use crate::pipeline::report::ReportLayout;
use crate::pipeline::schema::FieldSpec;
use crate::pipeline::strategy::DiagnosticModule;

use super::imaging;

/// Lung cancer: chest image plus name, age, gender.
pub struct LungModule;

impl DiagnosticModule for LungModule {
    fn id(&self) -> ModuleId {
        ModuleId::Lung
    }

    fn modality(&self) -> Modality {
        Modality::Image
    }

    fn fields(&self) -> &'static [FieldSpec] {
        imaging::FIELDS
    }

    fn predict_path(&self) -> &'static str {
        "/api/v1/predict/lung-pred"
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
        // The lung report prints the gender code as entered.
        imaging::layout(record, verdict, record.value("gender"), "Lung Cancer")
    }

    fn report_file_name(&self) -> &'static str {
        "lung_disease_report.pdf"
    }
}
