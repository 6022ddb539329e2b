pub mod types;
pub mod oracle;
pub mod scraper;
pub mod mock;
#[cfg(test)]
pub(crate) mod stub;

pub use types::*;
pub use oracle::*;
pub use scraper::*;
pub use mock::*;

use std::time::Duration;

use thiserror::Error;

use crate::config::Settings;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Cannot reach service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response has no usable {0:?} field")]
    MissingField(&'static str),

    #[error("Response parsing failed: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Credentials of the signed-in user, passed into every request-issuing
/// call. An anonymous session sends no `Authorization` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Shared HTTP client for the oracle and the scraper. Timeouts are only
/// set when configured.
pub fn build_http_client(settings: &Settings) -> Result<reqwest::Client, ServiceError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = settings.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ServiceError::HttpClient(e.to_string()))
}

/// Configured limits, kept by each client to report which one fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

impl Timeouts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            request_secs: settings.request_timeout_secs,
            connect_secs: settings.connect_timeout_secs,
        }
    }

    /// Seconds of the limit that expired. A timeout while connecting is the
    /// connect limit when one is set; otherwise the overall request limit.
    pub fn elapsed_limit(&self, while_connecting: bool) -> u64 {
        let limit = if while_connecting {
            self.connect_secs.or(self.request_secs)
        } else {
            self.request_secs.or(self.connect_secs)
        };
        limit.unwrap_or_default()
    }
}

pub(crate) fn map_send_error(base_url: &str, timeouts: Timeouts, e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(timeouts.elapsed_limit(e.is_connect()))
    } else if e.is_connect() {
        ServiceError::Connection(base_url.to_string())
    } else {
        ServiceError::HttpClient(e.to_string())
    }
}

/// Non-2xx responses become `Status` with the body kept for logs.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}
