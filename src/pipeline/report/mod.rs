pub mod layout;
pub mod template;
pub mod overlay;
pub mod artifact;
pub mod synthesizer;

pub use layout::*;
pub use template::*;
pub use overlay::*;
pub use artifact::*;
pub use synthesizer::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Report template unavailable: {0}")]
    TemplateUnavailable(String),

    #[error("Report template is not a usable PDF: {0}")]
    MalformedTemplate(String),

    #[error("PDF encoding failed: {0}")]
    Encode(String),
}
