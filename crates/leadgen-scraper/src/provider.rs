use async_trait::async_trait;

use crate::error::ScraperError;
use crate::types::{ProviderResponse, SearchRequest};

/// The external search capability.
///
/// [`crate::OutscraperClient`] is the production implementation; the server
/// receives it as a trait object so tests can hand in a scripted provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Starts a search. The response is either final or `"Pending"` with a
    /// `results_location` to poll.
    async fn search(&self, request: &SearchRequest) -> Result<ProviderResponse, ScraperError>;

    /// Fetches the current state of a pending search.
    async fn fetch_results(&self, location: &str) -> Result<ProviderResponse, ScraperError>;
}
