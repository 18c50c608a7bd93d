//! Search orchestration: run a provider search, wait out deferred results,
//! normalize them, and merge them into the lead store.
//!
//! [`SearchOrchestrator::run`] never fails. Every path ends in a lead
//! collection the page can show: the freshly merged store, an empty list
//! when the provider found nothing, or the last saved leads when anything
//! went wrong along the way.

use std::sync::Arc;

use leadgen_core::{FlagMode, Lead};
use leadgen_scraper::{
    normalize_payload, search_and_wait, Locale, PollPolicy, ScraperError, SearchProvider,
    SearchRequest,
};
use leadgen_store::{LeadStore, StoreError};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 500;

/// Search fields as posted by the page.
///
/// Either a free-text `query`, or a `name` and `area` pair joined with a
/// space. A non-blank `query` wins.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub limit: Option<LimitValue>,
}

/// `limit` as posted: a string from a form, or a number from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LimitValue {
    Number(i64),
    Text(String),
}

impl SearchForm {
    /// The query text to send, or `None` when every field is blank.
    #[must_use]
    pub fn query_text(&self) -> Option<String> {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
        };

        if let Some(query) = non_blank(&self.query) {
            return Some(query);
        }

        let joined = [non_blank(&self.name), non_blank(&self.area)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }

    /// Parsed result limit: blank or unparseable falls back to
    /// [`DEFAULT_LIMIT`]; the value is clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn limit(&self) -> u32 {
        let requested = match &self.limit {
            Some(LimitValue::Number(n)) => Some(*n),
            Some(LimitValue::Text(s)) => s.trim().parse::<i64>().ok(),
            None => None,
        };
        requested.map_or(DEFAULT_LIMIT, |n| {
            u32::try_from(n.clamp(1, i64::from(MAX_LIMIT))).unwrap_or(DEFAULT_LIMIT)
        })
    }
}

/// What a search produced, always carrying leads to display.
#[derive(Debug)]
pub enum SearchOutcome {
    /// New leads were merged; `leads` is the whole store, newest first.
    Completed { added: usize, leads: Vec<Lead> },
    /// The provider finished with an empty or non-array payload.
    NoResults,
    /// The form had nothing to search for; `leads` is the current store.
    MissingQuery { leads: Vec<Lead> },
    /// The search failed; `leads` is the last saved state.
    Fallback { leads: Vec<Lead> },
}

impl SearchOutcome {
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        match self {
            SearchOutcome::Completed { leads, .. }
            | SearchOutcome::MissingQuery { leads }
            | SearchOutcome::Fallback { leads } => leads,
            SearchOutcome::NoResults => &[],
        }
    }

    /// A one-line status for the page.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            SearchOutcome::Completed { added, .. } => format!("Added {added} new leads."),
            SearchOutcome::NoResults => "The search returned no results.".to_string(),
            SearchOutcome::MissingQuery { .. } => "Enter a business name or area.".to_string(),
            SearchOutcome::Fallback { .. } => {
                "The search failed; showing the last saved leads.".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
enum SearchError {
    #[error(transparent)]
    Provider(#[from] ScraperError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fixed per-process search options.
#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    pub locale: Locale,
    pub poll: PollPolicy,
    pub flags: FlagMode,
}

pub struct SearchOrchestrator {
    provider: Arc<dyn SearchProvider>,
    store: Arc<LeadStore>,
    settings: SearchSettings,
}

impl SearchOrchestrator {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        store: Arc<LeadStore>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }

    /// Composes the request from `form` and runs it.
    pub async fn run_form(&self, form: &SearchForm) -> SearchOutcome {
        let Some(query) = form.query_text() else {
            return SearchOutcome::MissingQuery {
                leads: self.last_known().await,
            };
        };

        self.run(SearchRequest {
            query,
            limit: form.limit(),
            locale: self.settings.locale.clone(),
        })
        .await
    }

    pub async fn run(&self, request: SearchRequest) -> SearchOutcome {
        match self.execute(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    query = %request.query,
                    "search failed, falling back to last saved leads"
                );
                SearchOutcome::Fallback {
                    leads: self.last_known().await,
                }
            }
        }
    }

    async fn execute(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let response =
            search_and_wait(self.provider.as_ref(), request, self.settings.poll).await?;

        let leads = normalize_payload(&response.data, self.settings.flags);
        if leads.is_empty() {
            tracing::info!(query = %request.query, "search completed with no results");
            return Ok(SearchOutcome::NoResults);
        }

        let added = leads.len();
        let merged = self.store.merge(leads).await?;
        tracing::info!(query = %request.query, added, total = merged.len(), "search completed");
        Ok(SearchOutcome::Completed {
            added,
            leads: merged,
        })
    }

    async fn last_known(&self) -> Vec<Lead> {
        self.store.load_or_empty().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read saved leads");
            Vec::new()
        })
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
