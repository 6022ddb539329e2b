use reqwest::multipart::{Form, Part};

use super::types::PredictionOracle;
use super::{build_http_client, check_status, map_send_error, ServiceError, Session, Timeouts};
use crate::config::Settings;
use crate::pipeline::request::{OrderedFields, PredictionBody, PredictionRequest};

/// Prediction oracle over HTTP.
pub struct HttpOracle {
    base_url: String,
    client: reqwest::Client,
    timeouts: Timeouts,
}

impl HttpOracle {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        Ok(Self::with_client(settings, build_http_client(settings)?))
    }

    /// Reuse an existing client (shared with the scraper).
    pub fn with_client(settings: &Settings, client: reqwest::Client) -> Self {
        Self {
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            client,
            timeouts: Timeouts::from_settings(settings),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PredictionOracle for HttpOracle {
    async fn predict(
        &self,
        request: &PredictionRequest,
        session: &Session,
    ) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, request.path);
        let builder = session.apply(self.client.post(&url));

        let (builder, require_non_empty) = match &request.body {
            PredictionBody::Json(fields) => (builder.json(&OrderedFields(fields)), false),
            PredictionBody::Multipart { image, fields } => {
                let part = Part::bytes(image.bytes.clone())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.mime_type)
                    .map_err(|e| ServiceError::HttpClient(e.to_string()))?;
                let form = fields
                    .iter()
                    .fold(Form::new().part("image", part), |form, field| {
                        form.text(field.name.clone(), field.value.clone())
                    });
                // Image endpoints signal failure with an empty prediction.
                (builder.multipart(form), true)
            }
        };

        tracing::info!(
            module = %request.module,
            path = request.path,
            fields = request.fields().len(),
            "Sending prediction request"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, self.timeouts, e))?;
        let response = check_status(response).await.inspect_err(|e| {
            tracing::warn!(module = %request.module, error = %e, "Prediction rejected");
        })?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))?;

        let verdict = body
            .get(request.result_field)
            .and_then(serde_json::Value::as_str)
            .filter(|text| !(require_non_empty && text.is_empty()))
            .ok_or(ServiceError::MissingField(request.result_field))?;

        tracing::info!(module = %request.module, "Prediction received");
        Ok(verdict.to_string())
    }
}
