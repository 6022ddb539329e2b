use std::sync::Arc;

use super::{overlay, ReportArtifact, ReportError, TemplateStore};
use crate::models::{CanonicalRecord, PredictionVerdict};
use crate::pipeline::strategy::DiagnosticModule;

/// Builds report artifacts from the shared template.
pub struct ReportSynthesizer {
    templates: TemplateStore,
}

impl ReportSynthesizer {
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Overlay the module's report lines on page 1 of the template.
    ///
    /// Output depends only on the template bytes and the inputs, so equal
    /// inputs give byte-identical artifacts.
    pub async fn synthesize(
        &self,
        module: &dyn DiagnosticModule,
        record: &CanonicalRecord,
        verdict: &PredictionVerdict,
    ) -> Result<ReportArtifact, ReportError> {
        let template = self.templates.load().await?;
        let layout = module.report_layout(record, verdict);
        let bytes = overlay(&template, &layout)?;

        tracing::info!(
            module = %module.id(),
            lines = layout.lines.len(),
            bytes = bytes.len(),
            "Report synthesized"
        );

        Ok(ReportArtifact {
            module: module.id(),
            file_name: module.report_file_name(),
            bytes: Arc::from(bytes),
        })
    }
}
