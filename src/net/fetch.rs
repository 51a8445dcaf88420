use std::time::Duration;

use url::Url;

use super::api::{ApproachQuery, ApproachSource, ApproachTable};
use crate::error::{NeoError, Result};

/// Blocking HTTP client for the close-approach endpoint.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        // Validate once so every query can assume a usable base URL
        Url::parse(endpoint)
            .map_err(|e| NeoError::Config(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("neo-viz/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| NeoError::Network(format!("client error: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl ApproachSource for HttpSource {
    fn fetch(&self, query: &ApproachQuery) -> Result<ApproachTable> {
        let url = query.to_url(&self.endpoint)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .header("Accept", "application/json")
            .send()
            .map_err(|e| NeoError::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| NeoError::Network(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            // The API explains rejected queries in a JSON `message`
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_default();
            return Err(NeoError::Network(format!("HTTP {} {}", status.as_u16(), detail)
                .trim_end()
                .to_string()));
        }

        ApproachTable::from_json(&body)
    }
}
