use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::ModuleId;
use crate::pipeline::upload::Upload;

/// One named parameter as the oracle receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireField {
    pub name: String,
    pub value: String,
}

impl WireField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// JSON object that keeps field order as given.
pub struct OrderedFields<'a>(pub &'a [WireField]);

impl Serialize for OrderedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Wire payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionBody {
    /// JSON object of string parameters.
    Json(Vec<WireField>),
    /// Multipart form: the `image` part followed by text parts.
    Multipart { image: Upload, fields: Vec<WireField> },
}

/// A fully validated request for one module's prediction endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub module: ModuleId,
    /// Endpoint path, relative to the API base URL.
    pub path: &'static str,
    /// Response field carrying the verdict.
    pub result_field: &'static str,
    pub body: PredictionBody,
}

impl PredictionRequest {
    /// The text parameters, in wire order.
    pub fn fields(&self) -> &[WireField] {
        match &self.body {
            PredictionBody::Json(fields) => fields,
            PredictionBody::Multipart { fields, .. } => fields,
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    /// JSON body text, only for parameter modules.
    pub fn json_body(&self) -> Option<String> {
        match &self.body {
            PredictionBody::Json(fields) => serde_json::to_string(&OrderedFields(fields)).ok(),
            PredictionBody::Multipart { .. } => None,
        }
    }
}
