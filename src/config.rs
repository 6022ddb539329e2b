use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MedPredict";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default prediction API backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medpredict=info,medpredict_lib=info"
}

/// Get the application data directory
/// ~/MedPredict/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the shared report template.
pub fn default_template_path() -> PathBuf {
    app_data_dir().join("ReportTemplate").join("Report.pdf")
}

/// Default directory generated reports are written to.
pub fn default_output_dir() -> PathBuf {
    app_data_dir().join("reports")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings for the pipeline.
///
/// Timeouts default to `None`: requests wait until the network resolves,
/// the way the web client always behaved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL shared by the prediction and scraper endpoints.
    pub api_base_url: String,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            template_path: default_template_path(),
            output_dir: default_output_dir(),
            request_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with `MEDPREDICT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Read settings from a JSON file, then apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEDPREDICT_API_URL") {
            self.api_base_url = url;
        }
        if let Some(path) = lookup("MEDPREDICT_TEMPLATE") {
            self.template_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("MEDPREDICT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("MEDPREDICT_TIMEOUT_SECS") {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "MEDPREDICT_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            self.request_timeout_secs = Some(parsed);
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
