//! Outscraper request and response shapes.
//!
//! Both the search endpoint and the `results_location` status endpoint answer
//! with the same envelope: a `status` string, and either a
//! `results_location` to poll (while `"Pending"`) or the `data` payload.

use serde::Deserialize;

pub const PENDING_STATUS: &str = "Pending";

/// Locale options sent with every search. Fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
    pub region: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: "IN".to_string(),
        }
    }
}

/// A single search: free-text query plus the maximum number of places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results_location: Option<String>,
    /// Raw payload; usually an array of per-query arrays of places.
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, alias = "errorMessage")]
    pub error_message: Option<String>,
}

impl ProviderResponse {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some(PENDING_STATUS)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.status.as_deref(), Some("Error" | "Failed"))
    }
}
