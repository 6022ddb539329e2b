use reqwest::multipart::{Form, Part};

use super::types::ReportScraper;
use super::{build_http_client, check_status, map_send_error, ServiceError, Session, Timeouts};
use crate::config::Settings;
use crate::models::RawExtraction;
use crate::pipeline::upload::Upload;

/// Multipart part name the scraper endpoints read the PDF from.
pub const REPORT_PART: &str = "pdfFile";

/// Lab-report scraper over HTTP.
pub struct HttpScraper {
    base_url: String,
    client: reqwest::Client,
    timeouts: Timeouts,
}

impl HttpScraper {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        Ok(Self::with_client(settings, build_http_client(settings)?))
    }

    pub fn with_client(settings: &Settings, client: reqwest::Client) -> Self {
        Self {
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            client,
            timeouts: Timeouts::from_settings(settings),
        }
    }
}

impl ReportScraper for HttpScraper {
    async fn scrape(
        &self,
        path: &str,
        report: &Upload,
        session: &Session,
    ) -> Result<RawExtraction, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let part = Part::bytes(report.bytes.clone())
            .file_name(report.file_name.clone())
            .mime_str(&report.mime_type)
            .map_err(|e| ServiceError::HttpClient(e.to_string()))?;
        let form = Form::new().part(REPORT_PART, part);

        tracing::info!(path, bytes = report.len(), "Uploading report for scraping");

        let response = session
            .apply(self.client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, self.timeouts, e))?;
        let response = check_status(response).await.inspect_err(|e| {
            tracing::warn!(path, error = %e, "Report scraping rejected");
        })?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;
        if !body.is_object() {
            return Err(ServiceError::ResponseParsing(
                "expected a JSON object of labels".to_string(),
            ));
        }

        let raw = RawExtraction::from_json(&body);
        tracing::info!(path, labels = raw.len(), "Report scraped");
        Ok(raw)
    }
}
