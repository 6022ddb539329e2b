use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{FieldSchema, SchemaError};
use crate::models::ModuleId;
use crate::pipeline::strategy::{all_modules, DiagnosticModule};

/// Validated, immutable schemas for every module. Loaded once at startup.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    /// Indexed by `ModuleId::index()`.
    schemas: Vec<FieldSchema>,
}

impl SchemaRegistry {
    /// Load and validate the built-in schemas.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_modules(&all_modules())
    }

    /// Load schemas from a set of strategies. Exactly one strategy per
    /// module id is expected; a missing id fails with `UnknownModule`.
    pub fn from_modules(modules: &[Arc<dyn DiagnosticModule>]) -> Result<Self, SchemaError> {
        let mut schemas = Vec::with_capacity(ModuleId::ALL.len());
        for id in ModuleId::ALL {
            let module = modules
                .iter()
                .find(|m| m.id() == id)
                .ok_or_else(|| SchemaError::UnknownModule(id.to_string()))?;
            let schema = module.schema();
            validate_schema(id, &schema)?;
            schemas.push(schema);
        }
        tracing::debug!(modules = schemas.len(), "Schema registry loaded");
        Ok(Self { schemas })
    }

    /// Schema for a module name such as `"heart"`.
    pub fn get_schema(&self, module: &str) -> Result<&FieldSchema, SchemaError> {
        let id: ModuleId = module.parse()?;
        Ok(self.schema(id))
    }

    pub fn schema(&self, id: ModuleId) -> &FieldSchema {
        &self.schemas[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSchema> {
        self.schemas.iter()
    }
}

/// Reject duplicate canonical names and labels claimed by two fields.
pub fn validate_schema(expected: ModuleId, schema: &FieldSchema) -> Result<(), SchemaError> {
    if schema.module != expected {
        return Err(SchemaError::ModuleMismatch {
            expected,
            found: schema.module,
        });
    }

    let mut names: HashSet<&str> = HashSet::new();
    let mut synonyms: HashMap<&'static str, &'static str> = HashMap::new();

    for field in &schema.fields {
        if !names.insert(field.name) {
            return Err(SchemaError::DuplicateField {
                module: expected,
                field: field.name,
            });
        }
        for &synonym in field.synonyms {
            if let Some(first) = synonyms.insert(synonym, field.name) {
                return Err(SchemaError::SynonymCollision {
                    module: expected,
                    synonym,
                    first,
                    second: field.name,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::schema::{FieldSpec, FieldType};

    #[test]
    fn builtin_registry_loads() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(registry.iter().count(), 4);
    }

    #[test]
    fn get_schema_by_name() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(registry.get_schema("heart").unwrap().len(), 13);
        assert_eq!(registry.get_schema("diabetes").unwrap().len(), 8);
        assert_eq!(registry.get_schema("breast").unwrap().len(), 3);
        assert_eq!(registry.get_schema("lung").unwrap().len(), 3);
    }

    #[test]
    fn unknown_module_fails() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert!(matches!(
            registry.get_schema("kidney"),
            Err(SchemaError::UnknownModule(_))
        ));
    }

    #[test]
    fn every_field_is_required() {
        let registry = SchemaRegistry::builtin().unwrap();
        for schema in registry.iter() {
            assert!(schema.fields.iter().all(|f| f.required), "{}", schema.module);
        }
    }

    #[test]
    fn missing_module_rejected() {
        let modules: Vec<_> = all_modules()
            .into_iter()
            .filter(|m| m.id() != ModuleId::Lung)
            .collect();
        let err = SchemaRegistry::from_modules(&modules).unwrap_err();
        assert_eq!(err, SchemaError::UnknownModule("lung".into()));
    }

    #[test]
    fn synonym_collision_detected() {
        let schema = FieldSchema {
            module: ModuleId::Diabetes,
            fields: vec![
                FieldSpec::new("glucose", "Glucose", FieldType::Number, &["Glucose"]),
                FieldSpec::new("insulin", "Insulin", FieldType::Number, &["Insulin", "Glucose"]),
            ],
        };
        let err = validate_schema(ModuleId::Diabetes, &schema).unwrap_err();
        assert_eq!(
            err,
            SchemaError::SynonymCollision {
                module: ModuleId::Diabetes,
                synonym: "Glucose",
                first: "glucose",
                second: "insulin",
            }
        );
    }

    #[test]
    fn duplicate_field_detected() {
        let schema = FieldSchema {
            module: ModuleId::Lung,
            fields: vec![
                FieldSpec::new("age", "Age", FieldType::Number, &[]),
                FieldSpec::new("age", "Age again", FieldType::Number, &[]),
            ],
        };
        assert!(matches!(
            validate_schema(ModuleId::Lung, &schema),
            Err(SchemaError::DuplicateField { field: "age", .. })
        ));
    }

    #[test]
    fn module_mismatch_detected() {
        let schema = FieldSchema {
            module: ModuleId::Heart,
            fields: vec![],
        };
        assert!(matches!(
            validate_schema(ModuleId::Lung, &schema),
            Err(SchemaError::ModuleMismatch { .. })
        ));
    }

    #[test]
    fn schema_serializes_with_choice_options() {
        let registry = SchemaRegistry::builtin().unwrap();
        let json = serde_json::to_value(registry.schema(ModuleId::Breast)).unwrap();
        assert_eq!(json["module"], "breast");
        assert_eq!(json["fields"][2]["kind"]["type"], "choice");
        assert_eq!(json["fields"][2]["kind"]["options"][0], "M");
    }
}
