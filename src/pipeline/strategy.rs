//! Per-module strategy objects.
//!
//! One generic workflow drives every diagnostic module; everything that
//! differs between them (fields, scraper vocabulary, wire shape, verdict
//! markers, report layout) is answered by a `DiagnosticModule`.

use std::sync::Arc;

use crate::models::{CanonicalRecord, Modality, ModuleId, PredictionVerdict};
use crate::pipeline::modules::{BreastModule, DiabetesModule, HeartModule, LungModule};
use crate::pipeline::report::ReportLayout;
use crate::pipeline::request::WireField;
use crate::pipeline::schema::{FieldSchema, FieldSpec};

// ═══════════════════════════════════════════════════════════
// Strategy contract
// ═══════════════════════════════════════════════════════════

pub trait DiagnosticModule: Send + Sync {
    fn id(&self) -> ModuleId;

    fn modality(&self) -> Modality;

    /// Canonical fields in form order.
    fn fields(&self) -> &'static [FieldSpec];

    fn schema(&self) -> FieldSchema {
        FieldSchema {
            module: self.id(),
            fields: self.fields().to_vec(),
        }
    }

    /// Prediction endpoint path, relative to the API base URL.
    fn predict_path(&self) -> &'static str;

    /// Report scraper endpoint path. `None` for modules without a PDF path.
    fn scrape_path(&self) -> Option<&'static str> {
        None
    }

    /// JSON field holding the verdict in the oracle's response.
    fn result_field(&self) -> &'static str;

    /// Coerce a scraped value for `field`. Default: surrounding whitespace
    /// trimmed, otherwise verbatim.
    fn coerce_scraped(&self, _field: &FieldSpec, raw: &str) -> String {
        raw.trim().to_string()
    }

    /// Parameters in the exact order and naming the oracle expects.
    /// Default: canonical names, verbatim values, schema order.
    fn wire_fields(&self, record: &CanonicalRecord) -> Vec<WireField> {
        record
            .iter()
            .map(|(name, value)| WireField::new(name, value))
            .collect()
    }

    /// Substrings that mark a verdict as negative.
    fn negative_markers(&self) -> &'static [&'static str];

    /// Ordered report lines for a frozen record and its verdict.
    fn report_layout(&self, record: &CanonicalRecord, verdict: &PredictionVerdict)
        -> ReportLayout;

    /// Download file name of the generated report.
    fn report_file_name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════
// Lookup
// ═══════════════════════════════════════════════════════════

/// Built-in strategy for a module id.
pub fn module_for(id: ModuleId) -> Arc<dyn DiagnosticModule> {
    match id {
        ModuleId::Heart => Arc::new(HeartModule),
        ModuleId::Lung => Arc::new(LungModule),
        ModuleId::Breast => Arc::new(BreastModule),
        ModuleId::Diabetes => Arc::new(DiabetesModule),
    }
}

/// Every built-in strategy, in `ModuleId::ALL` order.
pub fn all_modules() -> Vec<Arc<dyn DiagnosticModule>> {
    ModuleId::ALL.iter().map(|id| module_for(*id)).collect()
}
