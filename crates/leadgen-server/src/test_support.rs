//! Scripted search provider for orchestrator and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use leadgen_scraper::{PollPolicy, ProviderResponse, ScraperError, SearchProvider, SearchRequest};
use serde_json::{json, Value};

type Scripted = Result<ProviderResponse, ScraperError>;

pub(crate) struct FakeProvider {
    search_reply: Mutex<Option<Scripted>>,
    polls: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<SearchRequest>>,
    poll_count: Mutex<u32>,
}

impl FakeProvider {
    pub(crate) fn replying(reply: Scripted) -> Self {
        Self {
            search_reply: Mutex::new(Some(reply)),
            polls: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            poll_count: Mutex::new(0),
        }
    }

    pub(crate) fn with_polls(self, polls: Vec<ProviderResponse>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub(crate) fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn poll_count(&self) -> u32 {
        *self.poll_count.lock().unwrap()
    }
}

#[async_trait]
impl SearchProvider for FakeProvider {
    async fn search(&self, request: &SearchRequest) -> Result<ProviderResponse, ScraperError> {
        self.requests.lock().unwrap().push(request.clone());
        self.search_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ScraperError::Provider("no scripted reply".to_string())))
    }

    async fn fetch_results(&self, _location: &str) -> Result<ProviderResponse, ScraperError> {
        *self.poll_count.lock().unwrap() += 1;
        let next = self.polls.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(pending))
    }
}

pub(crate) fn pending() -> ProviderResponse {
    serde_json::from_value(json!({
        "id": "req-1",
        "status": "Pending",
        "results_location": "http://provider.test/requests/req-1"
    }))
    .unwrap()
}

pub(crate) fn success(data: Value) -> ProviderResponse {
    serde_json::from_value(json!({ "id": "req-1", "status": "Success", "data": data })).unwrap()
}

/// Three Mumbai cafes, one of them listed only via Justdial.
pub(crate) fn three_cafes() -> Value {
    json!([[
        {
            "name": "Cafe Mondegar",
            "phone": "+91 22 2202 0591",
            "site": "https://cafemondegar.example",
            "photos_count": 120,
            "location_link": "https://maps.google.com/?cid=1",
            "full_address": "Colaba, Mumbai",
            "rating": 4.3
        },
        {
            "name": "Kala Ghoda Cafe",
            "site": "https://www.justdial.com/Mumbai/Kala-Ghoda-Cafe",
            "rating": 4.4
        },
        {
            "name": "Prithvi Cafe",
            "full_address": "Juhu, Mumbai"
        }
    ]])
}

pub(crate) fn fast_poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(1),
        max_attempts: 10,
    }
}
