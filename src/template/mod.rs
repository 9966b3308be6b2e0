//! # Template Model
//!
//! A [`Template`] is a background graphic plus the fields placed on it. The
//! host application owns and persists templates; the editor only reads them
//! and reports replacement item lists.
//!
//! ## Items shape
//!
//! `items` is canonically a JSON array. A keyed mapping (`{"a": {...}, ...}`)
//! is also accepted and normalized to an array in document order, and `null`
//! reads as an empty list. Serialization always writes an array.

mod types;

pub use types::{DEFAULT_PLACEHOLDER_SIZE, FontWeight, ItemKind, LayoutItem};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::StencilError;

/// A reusable background plus a set of positioned fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background_image_url: String,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<LayoutItem>,
}

impl Template {
    pub fn new(id: impl Into<String>, background_image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            background_image_url: background_image_url.into(),
            items: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn item(mut self, item: LayoutItem) -> Self {
        self.items.push(item);
        self
    }

    /// Parse a template from JSON text.
    pub fn from_json(json: &str) -> Result<Self, StencilError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn find(&self, item_id: &str) -> Option<&LayoutItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Check the invariants the editor relies on.
    ///
    /// Item ids must be non-empty and unique, coordinates finite, and any
    /// explicit width/height finite and positive.
    pub fn validate(&self) -> Result<(), StencilError> {
        let mut seen = HashSet::new();
        for (i, item) in self.items.iter().enumerate() {
            if item.id.is_empty() {
                return Err(StencilError::InvalidTemplate(format!(
                    "items[{}]: empty id",
                    i
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(StencilError::InvalidTemplate(format!(
                    "items[{}]: duplicate id '{}'",
                    i, item.id
                )));
            }
            if !item.x.is_finite() || !item.y.is_finite() {
                return Err(StencilError::InvalidTemplate(format!(
                    "items[{}] ('{}'): position must be finite",
                    i, item.id
                )));
            }
            for (name, value) in [("width", item.width), ("height", item.height)] {
                if let Some(v) = value
                    && !(v.is_finite() && v > 0.0)
                {
                    return Err(StencilError::InvalidTemplate(format!(
                        "items[{}] ('{}'): {} must be positive, got {}",
                        i, item.id, name, v
                    )));
                }
            }
            if !(item.font_size.is_finite() && item.font_size > 0.0) {
                return Err(StencilError::InvalidTemplate(format!(
                    "items[{}] ('{}'): fontSize must be positive",
                    i, item.id
                )));
            }
        }
        Ok(())
    }
}

/// Accept `items` as an array, a keyed mapping, or null.
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<LayoutItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let entries: Vec<(String, serde_json::Value)> = match value {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(values)) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Some(serde_json::Value::Object(map)) => {
            tracing::debug!(count = map.len(), "normalizing keyed items mapping to a list");
            map.into_iter().collect()
        }
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "items: expected array or object, got {}",
                other
            )));
        }
    };

    entries
        .into_iter()
        .map(|(key, v)| {
            serde_json::from_value(v)
                .map_err(|e| serde::de::Error::custom(format!("items[{}]: {}", key, e)))
        })
        .collect()
}
