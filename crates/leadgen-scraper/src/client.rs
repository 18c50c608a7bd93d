//! HTTP client for the Outscraper Google Maps search API.
//!
//! Searches go to `{base}/maps/search-v3` with the API key in the
//! `X-API-KEY` header. Long-running searches come back `"Pending"` with a
//! `results_location`, which is fetched with a plain unauthenticated GET.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::provider::SearchProvider;
use crate::retry::retry_with_backoff;
use crate::types::{ProviderResponse, SearchRequest};

const DEFAULT_BASE_URL: &str = "https://api.app.outscraper.com/";
const SEARCH_PATH: &str = "maps/search-v3";
const API_KEY_HEADER: &str = "X-API-KEY";

/// Client for the Outscraper REST API.
///
/// Use [`OutscraperClient::new`] for production or
/// [`OutscraperClient::with_base_url`] to point at a mock server in tests.
pub struct OutscraperClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl OutscraperClient {
    /// Creates a new client pointed at the production Outscraper API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ScraperError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Retries are disabled
    /// until [`OutscraperClient::with_retry_policy`] is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ScraperError::InvalidUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("leadgen/0.1 (business-leads)")
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets how many times a transient failure is retried, and the base
    /// back-off delay in milliseconds.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn search_url(&self, request: &SearchRequest) -> Result<Url, ScraperError> {
        let mut url = self
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| ScraperError::InvalidUrl {
                url: format!("{}{SEARCH_PATH}", self.base_url),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &request.query);
            pairs.append_pair("limit", &request.limit.to_string());
            pairs.append_pair("language", &request.locale.language);
            pairs.append_pair("region", &request.locale.region);
        }
        Ok(url)
    }

    /// Sends a GET, maps non-2xx statuses to typed errors, and decodes the
    /// provider envelope.
    async fn get_envelope(
        &self,
        url: Url,
        authenticated: bool,
    ) -> Result<ProviderResponse, ScraperError> {
        let mut request = self.client.get(url.clone());
        if authenticated {
            request = request.header(API_KEY_HEADER, &self.api_key);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: ProviderResponse =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        // A final error envelope carries no payload. Surfacing it as an error
        // keeps the provider's message in the logs; callers fall back to the
        // saved leads rather than rendering an empty result.
        Self::check_provider_error(envelope)
    }

    /// Surfaces an explicit error envelope as [`ScraperError::Provider`].
    fn check_provider_error(envelope: ProviderResponse) -> Result<ProviderResponse, ScraperError> {
        if envelope.is_error() {
            let msg = envelope
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ScraperError::Provider(msg));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl SearchProvider for OutscraperClient {
    async fn search(&self, request: &SearchRequest) -> Result<ProviderResponse, ScraperError> {
        let url = self.search_url(request)?;
        tracing::debug!(query = %request.query, limit = request.limit, "starting provider search");
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_envelope(url.clone(), true)
        })
        .await
    }

    async fn fetch_results(&self, location: &str) -> Result<ProviderResponse, ScraperError> {
        let url = Url::parse(location).map_err(|e| ScraperError::InvalidUrl {
            url: location.to_string(),
            reason: e.to_string(),
        })?;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_envelope(url.clone(), false)
        })
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
