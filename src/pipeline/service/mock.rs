use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::{PredictionOracle, ReportScraper};
use super::{ServiceError, Session};
use crate::models::RawExtraction;
use crate::pipeline::request::PredictionRequest;
use crate::pipeline::upload::Upload;

/// Mock oracle for testing: returns a configured verdict or error and
/// remembers the requests it saw.
pub struct MockOracle {
    response: Result<String, ServiceError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl MockOracle {
    pub fn new(verdict: &str) -> Self {
        Self::with_result(Ok(verdict.to_string()))
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(response: Result<String, ServiceError>) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PredictionRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl PredictionOracle for MockOracle {
    async fn predict(
        &self,
        request: &PredictionRequest,
        _session: &Session,
    ) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        self.response.clone()
    }
}

/// Mock scraper for testing.
pub struct MockScraper {
    response: Result<RawExtraction, ServiceError>,
    calls: AtomicUsize,
}

impl MockScraper {
    pub fn new(raw: RawExtraction) -> Self {
        Self {
            response: Ok(raw),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReportScraper for MockScraper {
    async fn scrape(
        &self,
        _path: &str,
        _report: &Upload,
        _session: &Session,
    ) -> Result<RawExtraction, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
