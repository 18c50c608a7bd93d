pub mod client;
pub mod error;
pub mod normalize;
pub mod poll;
pub mod provider;
mod retry;
pub mod types;

pub use client::OutscraperClient;
pub use error::ScraperError;
pub use normalize::{flatten_payload, normalize_payload, normalize_place};
pub use poll::{poll_until_complete, search_and_wait, PollPolicy};
pub use provider::SearchProvider;
pub use types::{Locale, ProviderResponse, SearchRequest};
