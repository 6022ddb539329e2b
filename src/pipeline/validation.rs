//! Local checks that run before anything reaches the network.

use thiserror::Error;

use crate::models::{CanonicalRecord, Modality};
use crate::pipeline::schema::{FieldSchema, FieldType};
use crate::pipeline::upload::Upload;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid value {value:?} for {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Please upload an image file.")]
    MissingImage,

    #[error("Please upload a valid image file.")]
    InvalidImageType(String),

    #[error("Please upload a valid PDF file.")]
    InvalidReportType(String),
}

/// Required fields filled and choice fields holding a known code.
pub fn validate_record(record: &CanonicalRecord, schema: &FieldSchema) -> Result<(), ValidationError> {
    let missing = record.missing_required(schema);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    for field in &schema.fields {
        if let FieldType::Choice(options) = field.kind {
            let value = record.value(field.name).trim();
            if !value.is_empty() && !options.iter().any(|o| *o == value) {
                return Err(ValidationError::InvalidChoice {
                    field: field.name,
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Image modules need an `image/*` upload; parameter modules take none.
pub fn validate_image(modality: Modality, image: Option<&Upload>) -> Result<(), ValidationError> {
    match (modality, image) {
        (Modality::Parameters, _) => Ok(()),
        (Modality::Image, None) => Err(ValidationError::MissingImage),
        (Modality::Image, Some(upload)) if !upload.is_image() => {
            Err(ValidationError::InvalidImageType(upload.mime_type.clone()))
        }
        (Modality::Image, Some(_)) => Ok(()),
    }
}

/// The scraper only accepts PDFs.
pub fn validate_report_upload(upload: &Upload) -> Result<(), ValidationError> {
    if upload.is_pdf() {
        Ok(())
    } else {
        Err(ValidationError::InvalidReportType(upload.mime_type.clone()))
    }
}
