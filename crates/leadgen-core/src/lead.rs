//! The flat lead record shared by the scraper, the store, and the server.
//!
//! Field names serialize in camelCase and in declaration order; the leads
//! file and the spreadsheet header both depend on that order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for text fields the provider left empty.
pub const DEFAULT_TEXT: &str = "N/A";

/// Placeholder for a missing map link.
pub const DEFAULT_LOCATION_LINK: &str = "#";

pub const JUSTDIAL_DOMAIN: &str = "justdial.com";
pub const TRIPADVISOR_DOMAIN: &str = "tripadvisor.com";

/// A place rating: the provider sends a number, the placeholder is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(serde_json::Number),
    Text(String),
}

impl Default for Rating {
    fn default() -> Self {
        Rating::Text(DEFAULT_TEXT.to_string())
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Score(n) => write!(f, "{n}"),
            Rating::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// Whether normalization derives the aggregator flags for each lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagMode {
    #[default]
    Enabled,
    Disabled,
}

/// Which known listing aggregators a website belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregatorFlags {
    pub justdial: bool,
    pub tripadvisor: bool,
}

impl AggregatorFlags {
    /// Substring match against the known aggregator domains. The
    /// [`DEFAULT_TEXT`] placeholder matches nothing.
    #[must_use]
    pub fn detect(website: &str) -> Self {
        Self {
            justdial: website.contains(JUSTDIAL_DOMAIN),
            tripadvisor: website.contains(TRIPADVISOR_DOMAIN),
        }
    }
}

/// One normalized business listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub website: String,
    pub photos_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_justdial: Option<YesNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tripadvisor: Option<YesNo>,
    pub location_link: String,
    pub address: String,
    pub rating: Rating,
}

impl Default for Lead {
    fn default() -> Self {
        Self {
            name: DEFAULT_TEXT.to_string(),
            phone: DEFAULT_TEXT.to_string(),
            website: DEFAULT_TEXT.to_string(),
            photos_count: 0,
            is_justdial: None,
            is_tripadvisor: None,
            location_link: DEFAULT_LOCATION_LINK.to_string(),
            address: DEFAULT_TEXT.to_string(),
            rating: Rating::default(),
        }
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl Lead {
    /// Sets both aggregator flags from the current `website`.
    #[must_use]
    pub fn with_flags(mut self) -> Self {
        let flags = AggregatorFlags::detect(&self.website);
        self.is_justdial = Some(YesNo::from_bool(flags.justdial));
        self.is_tripadvisor = Some(YesNo::from_bool(flags.tripadvisor));
        self
    }

    /// The lead's fields as `(key, value)` pairs in serialization order.
    /// Absent flags are left out, exactly as they are in the JSON file.
    #[must_use]
    pub fn columns(&self) -> Vec<(&'static str, CellValue)> {
        #[allow(clippy::cast_precision_loss)]
        let photos = CellValue::Number(self.photos_count as f64);
        let rating = match &self.rating {
            Rating::Score(n) => n
                .as_f64()
                .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
            Rating::Text(s) => CellValue::Text(s.clone()),
        };

        let mut cols = vec![
            ("name", CellValue::Text(self.name.clone())),
            ("phone", CellValue::Text(self.phone.clone())),
            ("website", CellValue::Text(self.website.clone())),
            ("photosCount", photos),
        ];
        if let Some(flag) = self.is_justdial {
            cols.push(("isJustdial", CellValue::Text(flag.as_str().to_string())));
        }
        if let Some(flag) = self.is_tripadvisor {
            cols.push(("isTripadvisor", CellValue::Text(flag.as_str().to_string())));
        }
        cols.push(("locationLink", CellValue::Text(self.location_link.clone())));
        cols.push(("address", CellValue::Text(self.address.clone())));
        cols.push(("rating", rating));
        cols
    }
}
