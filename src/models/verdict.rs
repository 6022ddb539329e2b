use serde::{Deserialize, Serialize};

use super::enums::{ModuleId, VerdictClass};

/// Oracle result text plus its display classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionVerdict {
    pub module: ModuleId,
    /// Verbatim text returned by the oracle.
    pub text: String,
    pub class: VerdictClass,
}

impl PredictionVerdict {
    pub fn is_negative(&self) -> bool {
        self.class.is_negative()
    }
}
