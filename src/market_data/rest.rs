//! Shared REST plumbing for market data providers

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::types::FetchError;

/// Thin JSON-over-HTTP client shared by the providers
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
}

impl RestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Start a GET request against `url`
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send `request` with a per-request timeout and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<T, FetchError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(provider, timeout, e))?;

        let status = response.status();
        debug!("{} responded with HTTP {}", provider, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::ProviderUnavailable {
                provider,
                reason: format!("HTTP error {}: {}", status, truncate(&body, 200)),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(provider, timeout, e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::ProviderMalformedResponse {
            provider,
            reason: e.to_string(),
        })
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
