pub mod normalizer;

pub use normalizer::*;

use thiserror::Error;

use crate::models::ModuleId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Module {0} has no report scraping path")]
    UnsupportedModule(ModuleId),
}
