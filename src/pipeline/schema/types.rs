use serde::Serialize;

use crate::models::ModuleId;

/// Value type of a canonical field. Values always travel as text; the type
/// only tells the front end what to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "options")]
pub enum FieldType {
    Text,
    Number,
    /// One of a fixed set of codes.
    Choice(&'static [&'static str]),
}

/// One canonical field of a module schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Canonical name; unique within the module.
    pub name: &'static str,
    /// Human label shown on the form.
    pub label: &'static str,
    pub kind: FieldType,
    pub required: bool,
    /// Vendor labels a scraper may report this field under.
    pub synonyms: &'static [&'static str],
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldType,
        synonyms: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            synonyms,
        }
    }
}

/// Ordered field list of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub module: ModuleId,
    pub fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
