pub mod types;
pub mod registry;

pub use types::*;
pub use registry::*;

use thiserror::Error;

use crate::models::ModuleId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown diagnostic module: {0}")]
    UnknownModule(String),

    #[error("Duplicate field {field} in {module} schema")]
    DuplicateField { module: ModuleId, field: &'static str },

    #[error("Label {synonym:?} maps to both {first} and {second} in {module} schema")]
    SynonymCollision {
        module: ModuleId,
        synonym: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("Schema for {expected} reported module {found}")]
    ModuleMismatch { expected: ModuleId, found: ModuleId },
}
