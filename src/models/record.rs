use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::enums::ModuleId;
use crate::pipeline::schema::FieldSchema;

/// Flat label → value mapping returned by the report scraper.
///
/// Labels are vendor-defined free text. Nothing guarantees that a label is
/// known to any schema; unknown labels are simply never looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawExtraction(BTreeMap<String, String>);

impl RawExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the scraper's JSON body.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified,
    /// nulls and nested values are dropped. A non-object body yields an
    /// empty extraction.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        object
            .iter()
            .filter_map(|(label, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((label.clone(), text))
            })
            .collect()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), value.into());
    }

    /// Exact label lookup. Surrounding whitespace on the stored label is
    /// tolerated, since some scrapers keep the trailing space of a cell.
    pub fn get(&self, label: &str) -> Option<&str> {
        if let Some(v) = self.0.get(label) {
            return Some(v.as_str());
        }
        self.0
            .iter()
            .find(|(k, _)| k.trim() == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawExtraction {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Canonical field values for exactly one module's schema, in schema order.
///
/// Values stay textual: the oracle consumes the same strings the user typed.
/// Absent values are empty strings, never defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    module: ModuleId,
    values: Vec<(&'static str, String)>,
}

impl CanonicalRecord {
    /// Every schema field present and empty.
    pub fn empty(schema: &FieldSchema) -> Self {
        Self {
            module: schema.module,
            values: schema
                .fields
                .iter()
                .map(|f| (f.name, String::new()))
                .collect(),
        }
    }

    pub fn module(&self) -> ModuleId {
        self.module
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value for a field, empty when the field is blank or unknown.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Set a schema field. Returns `false` (and changes nothing) when
    /// `name` is not part of the schema.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count of fields holding a non-blank value.
    pub fn filled_count(&self) -> usize {
        self.values
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .count()
    }

    /// Required schema fields that are blank, in schema order.
    pub fn missing_required(&self, schema: &FieldSchema) -> Vec<&'static str> {
        schema
            .required_names()
            .filter(|name| self.value(name).trim().is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        for (_, v) in &mut self.values {
            v.clear();
        }
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
