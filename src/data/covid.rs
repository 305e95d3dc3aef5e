//! HTTP client for the COVID Tracking Project's US daily series.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{AppError, EXIT_USAGE};

pub const DEFAULT_URL: &str = "https://api.covidtracking.com/v1/us/daily.json";

/// Environment variable overriding the endpoint (also read from `.env`).
pub const URL_ENV: &str = "COVID_API_URL";

/// Anything that can hand back the raw daily rows.
///
/// The loader only ever talks to this trait, so the widget and the pipeline
/// can be driven by fixtures in tests.
pub trait DailySource: Send + Sync {
    fn fetch_raw(&self) -> Result<Vec<Value>, AppError>;

    /// Human-readable origin, used in logs and the status line.
    fn describe(&self) -> String;
}

pub struct CovidClient {
    client: Client,
    url: String,
}

impl CovidClient {
    /// Build a client for `url`. No request timeout is applied.
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Endpoint must be an http(s) URL, got '{url}'."),
            ));
        }
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    /// Resolve the endpoint: explicit override, then `COVID_API_URL`, then the default.
    pub fn from_env(url_override: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let url = match url_override {
            Some(url) => url.to_string(),
            None => std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string()),
        };
        Self::new(url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DailySource for CovidClient {
    fn fetch_raw(&self) -> Result<Vec<Value>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::data_unavailable(format!("COVID request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data_unavailable(format!(
                "COVID request failed with status {}.",
                resp.status()
            )));
        }

        resp.json::<Vec<Value>>()
            .map_err(|e| AppError::data_unavailable(format!("Failed to parse COVID response: {e}")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
