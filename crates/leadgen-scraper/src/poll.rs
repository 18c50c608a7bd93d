//! Waiting for deferred searches.
//!
//! The poll is a plain async loop: it owns no timer handle, and nothing of
//! it survives once it returns, whether with a result or an error.

use std::time::Duration;

use crate::error::ScraperError;
use crate::provider::SearchProvider;
use crate::types::{ProviderResponse, SearchRequest};

/// How often and how long to poll a `results_location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    /// Every 5 s for up to 10 minutes.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Fetches `location` every `policy.interval` until the status leaves
/// `"Pending"`.
///
/// The first fetch happens one interval after the call.
///
/// # Errors
///
/// - Any [`ScraperError`] from a fetch ends polling immediately.
/// - [`ScraperError::PollTimeout`] once `policy.max_attempts` fetches have
///   all come back pending.
pub async fn poll_until_complete(
    provider: &dyn SearchProvider,
    location: &str,
    policy: PollPolicy,
) -> Result<ProviderResponse, ScraperError> {
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;
        let response = provider.fetch_results(location).await?;
        if !response.is_pending() {
            tracing::info!(attempt, status = ?response.status, "deferred search resolved");
            return Ok(response);
        }
        tracing::debug!(attempt, max_attempts = policy.max_attempts, "results still pending");
    }

    Err(ScraperError::PollTimeout {
        location: location.to_string(),
        attempts: policy.max_attempts,
    })
}

/// Runs a search and, if the provider defers it, polls until it resolves.
///
/// # Errors
///
/// Propagates errors from the search call and from [`poll_until_complete`].
/// A pending response without a `results_location` is a
/// [`ScraperError::Provider`] error.
pub async fn search_and_wait(
    provider: &dyn SearchProvider,
    request: &SearchRequest,
    policy: PollPolicy,
) -> Result<ProviderResponse, ScraperError> {
    let response = provider.search(request).await?;
    if !response.is_pending() {
        return Ok(response);
    }

    let location = response.results_location.as_deref().ok_or_else(|| {
        ScraperError::Provider("pending response without results_location".to_string())
    })?;
    tracing::info!(location, "search deferred by provider, polling for results");
    poll_until_complete(provider, location, policy).await
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::types::Locale;

    /// Provider that answers `search` once and `fetch_results` from a script.
    struct ScriptedProvider {
        initial: ProviderResponse,
        polls: Mutex<VecDeque<ProviderResponse>>,
        poll_count: Mutex<u32>,
    }

    impl ScriptedProvider {
        fn new(initial: ProviderResponse, polls: Vec<ProviderResponse>) -> Self {
            Self {
                initial,
                polls: Mutex::new(polls.into()),
                poll_count: Mutex::new(0),
            }
        }

        fn poll_count(&self) -> u32 {
            *self.poll_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn search(&self, _request: &SearchRequest) -> Result<ProviderResponse, ScraperError> {
            Ok(self.initial.clone())
        }

        async fn fetch_results(&self, _location: &str) -> Result<ProviderResponse, ScraperError> {
            *self.poll_count.lock().unwrap() += 1;
            let next = self.polls.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(pending))
        }
    }

    fn pending() -> ProviderResponse {
        serde_json::from_value(json!({
            "status": "Pending",
            "results_location": "http://provider.test/requests/1"
        }))
        .unwrap()
    }

    fn success(data: serde_json::Value) -> ProviderResponse {
        serde_json::from_value(json!({ "status": "Success", "data": data })).unwrap()
    }

    fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    fn request() -> SearchRequest {
        SearchRequest {
            query: "Coffee Shop Mumbai".to_string(),
            limit: 5,
            locale: Locale::default(),
        }
    }

    #[tokio::test]
    async fn immediate_response_skips_polling() {
        let provider = ScriptedProvider::new(success(json!([[{"name": "A"}]])), vec![]);
        let resp = search_and_wait(&provider, &request(), fast_policy(3))
            .await
            .unwrap();
        assert_eq!(resp.status.as_deref(), Some("Success"));
        assert_eq!(provider.poll_count(), 0);
    }

    #[tokio::test]
    async fn polls_until_status_leaves_pending() {
        let provider = ScriptedProvider::new(
            pending(),
            vec![pending(), pending(), success(json!([[{"name": "A"}]]))],
        );
        let resp = search_and_wait(&provider, &request(), fast_policy(10))
            .await
            .unwrap();
        assert_eq!(resp.data, json!([[{"name": "A"}]]));
        assert_eq!(provider.poll_count(), 3, "no poll after resolution");
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let provider = ScriptedProvider::new(pending(), vec![]);
        let err = search_and_wait(&provider, &request(), fast_policy(4))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ScraperError::PollTimeout { attempts: 4, .. }),
            "got: {err:?}"
        );
        assert_eq!(provider.poll_count(), 4);
    }

    #[tokio::test]
    async fn pending_without_location_is_an_error() {
        let initial: ProviderResponse =
            serde_json::from_value(json!({ "status": "Pending" })).unwrap();
        let provider = ScriptedProvider::new(initial, vec![]);
        let err = search_and_wait(&provider, &request(), fast_policy(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::Provider(_)));
        assert_eq!(provider.poll_count(), 0);
    }
}
