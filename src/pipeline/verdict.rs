use crate::models::{PredictionVerdict, VerdictClass};
use crate::pipeline::strategy::DiagnosticModule;

/// Classify oracle text for display.
///
/// Case-sensitive substring match on the module's negative markers. The
/// verdict text itself is kept verbatim.
pub fn classify(module: &dyn DiagnosticModule, text: &str) -> PredictionVerdict {
    let negative = module
        .negative_markers()
        .iter()
        .any(|marker| text.contains(marker));
    PredictionVerdict {
        module: module.id(),
        text: text.to_string(),
        class: if negative {
            VerdictClass::Negative
        } else {
            VerdictClass::Positive
        },
    }
}
