use std::future::Future;

use super::{ServiceError, Session};
use crate::models::RawExtraction;
use crate::pipeline::request::PredictionRequest;
use crate::pipeline::upload::Upload;

/// The remote prediction service. Returns the verdict text verbatim.
pub trait PredictionOracle: Send + Sync {
    fn predict(
        &self,
        request: &PredictionRequest,
        session: &Session,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

/// The remote lab-report scraper. Returns a flat label → value mapping.
pub trait ReportScraper: Send + Sync {
    fn scrape(
        &self,
        path: &str,
        report: &Upload,
        session: &Session,
    ) -> impl Future<Output = Result<RawExtraction, ServiceError>> + Send;
}
