use super::NormalizeError;
use crate::models::{CanonicalRecord, RawExtraction};
use crate::pipeline::schema::FieldSchema;
use crate::pipeline::strategy::DiagnosticModule;

/// Map a scraper's label → value mapping onto the module's schema.
///
/// Each schema field is looked up by its vendor labels (exact match). Found
/// values go through the module's coercion; fields with no matching label
/// stay empty. Labels that match no field are ignored. Only modules without
/// a scraper path fail.
pub fn normalize(
    module: &dyn DiagnosticModule,
    schema: &FieldSchema,
    raw: &RawExtraction,
) -> Result<CanonicalRecord, NormalizeError> {
    if module.scrape_path().is_none() {
        return Err(NormalizeError::UnsupportedModule(module.id()));
    }

    let mut record = CanonicalRecord::empty(schema);
    let mut matched = 0usize;

    for field in &schema.fields {
        let found = field.synonyms.iter().find_map(|label| raw.get(label));
        if let Some(value) = found {
            record.set(field.name, module.coerce_scraped(field, value));
            matched += 1;
        }
    }

    let missing = record.missing_required(schema);
    tracing::info!(
        module = %module.id(),
        raw_labels = raw.len(),
        matched,
        missing = missing.len(),
        "Normalized scraped report"
    );
    if !missing.is_empty() {
        tracing::debug!(module = %module.id(), missing = ?missing, "Scraped report has gaps");
    }

    Ok(record)
}
