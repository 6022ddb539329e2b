pub mod state;
pub mod controller;

pub use state::*;
pub use controller::*;

use thiserror::Error;

use crate::pipeline::normalize::NormalizeError;
use crate::pipeline::report::ReportError;
use crate::pipeline::service::ServiceError;
use crate::pipeline::validation::ValidationError;

pub const PREDICT_FAILED_MESSAGE: &str = "Failed to predict. Please try again.";
pub const SCRAPE_FAILED_MESSAGE: &str = "Failed to process PDF. Please try again.";
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate PDF. Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("A request is already in progress")]
    Busy,

    #[error("Cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Prediction failed: {0}")]
    PredictionFailed(ServiceError),

    #[error("Report scraping failed: {0}")]
    ScrapeFailed(ServiceError),

    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),

    #[error(transparent)]
    UnsupportedModule(#[from] NormalizeError),

    #[error("Request was superseded")]
    Superseded,
}

impl WorkflowError {
    /// The one sentence shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::PredictionFailed(_) => PREDICT_FAILED_MESSAGE.to_string(),
            Self::ScrapeFailed(_) => SCRAPE_FAILED_MESSAGE.to_string(),
            Self::Report(_) => EXPORT_FAILED_MESSAGE.to_string(),
            Self::Busy => "Please wait for the current request to finish.".to_string(),
            Self::InvalidTransition { .. } | Self::UnsupportedModule(_) | Self::Superseded => {
                self.to_string()
            }
        }
    }
}
