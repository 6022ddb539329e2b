use super::{PredictionBody, PredictionRequest};
use crate::models::{CanonicalRecord, Modality};
use crate::pipeline::schema::FieldSchema;
use crate::pipeline::strategy::DiagnosticModule;
use crate::pipeline::upload::Upload;
use crate::pipeline::validation::{validate_image, validate_record, ValidationError};

/// Serialize a record (plus the image for imaging modules) into the shape
/// the module's endpoint expects.
///
/// Validation happens here, so an incomplete record never produces a
/// request and never reaches the network.
pub fn build_request(
    module: &dyn DiagnosticModule,
    schema: &FieldSchema,
    record: &CanonicalRecord,
    image: Option<&Upload>,
) -> Result<PredictionRequest, ValidationError> {
    validate_record(record, schema)?;
    validate_image(module.modality(), image)?;

    let fields = module.wire_fields(record);
    let body = match (module.modality(), image) {
        (Modality::Image, Some(upload)) => PredictionBody::Multipart {
            image: upload.clone(),
            fields,
        },
        // validate_image rejected the image-without-upload case
        _ => PredictionBody::Json(fields),
    };

    Ok(PredictionRequest {
        module: module.id(),
        path: module.predict_path(),
        result_field: module.result_field(),
        body,
    })
}
