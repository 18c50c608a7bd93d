//! Normalization from raw Outscraper place objects to [`Lead`]s.
//!
//! Place shapes vary between requests, so places stay as
//! [`serde_json::Value`] until here. A source field that is missing or
//! falsy (`null`, `false`, `0`, `""`) takes the lead's default, which means
//! a genuinely empty website is indistinguishable from no website.

use leadgen_core::{FlagMode, Lead, Rating, DEFAULT_LOCATION_LINK, DEFAULT_TEXT};
use serde_json::Value;

/// Flattens one level of nesting from a provider payload.
///
/// The provider returns one array of places per query, wrapped in an outer
/// array. Non-array payloads yield nothing, as do entries that are not
/// place objects.
#[must_use]
pub fn flatten_payload(data: &Value) -> Vec<&Value> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };

    let mut places = Vec::new();
    for item in items {
        match item {
            Value::Array(group) => places.extend(group.iter()),
            other => places.push(other),
        }
    }

    let before = places.len();
    places.retain(|p| p.is_object());
    if places.len() != before {
        tracing::debug!(
            skipped = before - places.len(),
            "dropped non-object entries from provider payload"
        );
    }
    places
}

/// Maps one raw place to a [`Lead`], substituting defaults for falsy fields.
#[must_use]
pub fn normalize_place(place: &Value, flags: FlagMode) -> Lead {
    let lead = Lead {
        name: text_field(place, "name", DEFAULT_TEXT),
        phone: text_field(place, "phone", DEFAULT_TEXT),
        website: text_field(place, "site", DEFAULT_TEXT),
        photos_count: count_field(place, "photos_count"),
        is_justdial: None,
        is_tripadvisor: None,
        location_link: text_field(place, "location_link", DEFAULT_LOCATION_LINK),
        address: text_field(place, "full_address", DEFAULT_TEXT),
        rating: rating_field(place, "rating"),
    };

    match flags {
        FlagMode::Enabled => lead.with_flags(),
        FlagMode::Disabled => lead,
    }
}

/// Flattens and normalizes a whole payload, preserving order.
#[must_use]
pub fn normalize_payload(data: &Value, flags: FlagMode) -> Vec<Lead> {
    flatten_payload(data)
        .into_iter()
        .map(|place| normalize_place(place, flags))
        .collect()
}

/// JavaScript truthiness for JSON values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(place: &'a Value, key: &str) -> Option<&'a Value> {
    place.get(key).filter(|v| is_truthy(v))
}

fn text_field(place: &Value, key: &str, default: &str) -> String {
    match truthy_field(place, key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// Whole-number counts; numeric strings are parsed, anything else is 0.
fn count_field(place: &Value, key: &str) -> i64 {
    match truthy_field(place, key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| {
            #[allow(clippy::cast_possible_truncation)]
            let truncated = n.as_f64().unwrap_or_default() as i64;
            truncated
        }),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn rating_field(place: &Value, key: &str) -> Rating {
    match truthy_field(place, key) {
        Some(Value::Number(n)) => Rating::Score(n.clone()),
        Some(Value::String(s)) => Rating::Text(s.clone()),
        Some(other) => Rating::Text(other.to_string()),
        None => Rating::default(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
