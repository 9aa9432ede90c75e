//! Record normalization: raw listing → flat output record.
//!
//! Two fixed projections (detailed, compact) over the same underlying
//! normalized data. Nested attribute/user/location structures in the
//! raw payload are flattened into single-level keys with fixed
//! prefixes; every emitted record has exactly one level of structural
//! depth except for explicitly multi-valued fields (image URL lists,
//! filter provenance), which stay arrays. Unknown raw fields are
//! dropped, not passed through, so the output schema stays stable
//! across marketplace payload changes.

use chine_core::OutputShape;
use chine_fetch::RawListing;
use chine_search::{FilterValue, SearchScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Timestamp format used for all emitted date fields.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix for attribute-derived fields.
const ATTR_PREFIX: &str = "attr_";
/// Prefix for seller-derived fields.
const USER_PREFIX: &str = "user_";
/// Prefix for location-derived fields.
const LOCATION_PREFIX: &str = "location_";

/// Scalar payload fields passed through under their own name.
const SCALAR_FIELDS: &[&str] = &[
    "subject",
    "body",
    "url",
    "status",
    "category_id",
    "category_name",
    "ad_type",
    "expiration_date",
];

/// Field names the compact projection keeps.
///
/// Kept a strict subset of what the detailed projection can produce so
/// the compact shape is always a field-subset of detailed.
const COMPACT_FIELDS: &[&str] = &[
    "id",
    "subject",
    "price",
    "url",
    "location_city",
    "location_zipcode",
    "first_publication_date",
    "index_date",
    "scraped_at",
    "search_scope",
    "search_category",
];

/// One normalized output record: a flat, ordered field map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: BTreeMap<String, Value>,
}

impl NormalizedRecord {
    /// The record identifier, always string-formatted.
    #[must_use]
    pub fn id(&self) -> &str {
        self.fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Consume the record into its field map.
    #[must_use]
    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

/// Maps raw listings plus their search context into output records.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    shape: OutputShape,
}

impl Normalizer {
    /// Create a normalizer emitting the given projection.
    #[must_use]
    pub fn new(shape: OutputShape) -> Self {
        Self { shape }
    }

    /// The projection this normalizer emits.
    #[must_use]
    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    /// Normalize one listing in the context of its originating scope.
    #[must_use]
    pub fn normalize(
        &self,
        listing: &RawListing,
        scope: &SearchScope,
        scraped_at: DateTime<Utc>,
    ) -> NormalizedRecord {
        let mut fields = BTreeMap::new();

        fields.insert(
            "id".to_string(),
            Value::String(listing.id.as_str().to_string()),
        );
        fields.insert(
            "first_publication_date".to_string(),
            Value::String(listing.published_at.format(DATE_FORMAT).to_string()),
        );
        if let Some(indexed_at) = listing.indexed_at {
            fields.insert(
                "index_date".to_string(),
                Value::String(indexed_at.format(DATE_FORMAT).to_string()),
            );
        }
        fields.insert(
            "scraped_at".to_string(),
            Value::String(scraped_at.format(DATE_FORMAT).to_string()),
        );

        // Provenance: originating scope and filter set
        fields.insert(
            "search_scope".to_string(),
            Value::String(scope.label.clone()),
        );
        fields.insert(
            "search_category".to_string(),
            Value::String(category_name(scope)),
        );
        if !scope.filters.is_empty() {
            let summary: Vec<Value> = scope
                .filters
                .iter()
                .map(|(name, value)| Value::String(format!("{name}={}", filter_summary(value))))
                .collect();
            fields.insert("search_filters".to_string(), Value::Array(summary));
        }

        if let Value::Object(payload) = &listing.payload {
            flatten_payload(payload, &mut fields);
        }

        if self.shape == OutputShape::Compact {
            fields.retain(|name, _| COMPACT_FIELDS.contains(&name.as_str()));
        }

        NormalizedRecord { fields }
    }
}

fn category_name(scope: &SearchScope) -> String {
    // serde's snake_case rendering is the stable external name
    serde_json::to_value(scope.category)
        .ok()
        .and_then(|v| v.as_str().map(ToString::to_string))
        .unwrap_or_else(|| "all".to_string())
}

fn filter_summary(value: &FilterValue) -> String {
    match value {
        FilterValue::Scalar(s) => s.clone(),
        FilterValue::Range { min, max } => format!(
            "{}-{}",
            min.map(|v| v.to_string()).unwrap_or_default(),
            max.map(|v| v.to_string()).unwrap_or_default()
        ),
        FilterValue::Values(vals) => vals.join("|"),
    }
}

fn flatten_payload(payload: &Map<String, Value>, fields: &mut BTreeMap<String, Value>) {
    for (key, value) in payload {
        match key.as_str() {
            "price" => {
                if let Some(price) = normalize_price(value) {
                    fields.insert("price".to_string(), price);
                }
            }
            "images" => {
                if let Some(urls) = image_urls(value) {
                    fields.insert("images".to_string(), Value::Array(urls));
                }
            }
            "attributes" => flatten_attributes(value, fields),
            "owner" | "user" => flatten_object(value, USER_PREFIX, fields),
            "location" => flatten_object(value, LOCATION_PREFIX, fields),
            key if SCALAR_FIELDS.contains(&key) => {
                if is_scalar(value) {
                    fields.insert(key.to_string(), value.clone());
                }
            }
            // Unknown fields are dropped to keep the schema stable
            _ => {}
        }
    }
}

/// The upstream sends prices either as a bare number or a one-element
/// array; both normalize to a number.
fn normalize_price(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::Array(items) => items.first().filter(|v| v.is_number()).cloned(),
        _ => None,
    }
}

/// Image payloads are either a plain URL list or an object carrying a
/// `urls` list; either way only the string URLs survive.
fn image_urls(value: &Value) -> Option<Vec<Value>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj.get("urls")?.as_array()?,
        _ => return None,
    };
    let urls: Vec<Value> = items.iter().filter(|v| v.is_string()).cloned().collect();
    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}

/// Attributes arrive either as a `{key: value}` object or as a list of
/// `{key, value}` entries.
fn flatten_attributes(value: &Value, fields: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(_) => flatten_object(value, ATTR_PREFIX, fields),
        Value::Array(entries) => {
            for entry in entries {
                let Some(obj) = entry.as_object() else {
                    continue;
                };
                let Some(key) = obj.get("key").and_then(Value::as_str) else {
                    continue;
                };
                let value = obj
                    .get("value_label")
                    .or_else(|| obj.get("value"))
                    .filter(|v| is_scalar(v));
                if let Some(value) = value {
                    fields.insert(format!("{ATTR_PREFIX}{key}"), value.clone());
                }
            }
        }
        _ => {}
    }
}

fn flatten_object(value: &Value, prefix: &str, fields: &mut BTreeMap<String, Value>) {
    let Some(obj) = value.as_object() else {
        return;
    };
    for (key, value) in obj {
        // Only scalars survive flattening; deeper nesting is dropped
        if is_scalar(value) {
            fields.insert(format!("{prefix}{key}"), value.clone());
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Number(_) | Value::Bool(_)
    )
}
