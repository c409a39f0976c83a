//! Catalog product records.
//!
//! Records come from an external loader and are read-only here. Decoding is
//! deliberately forgiving: a missing, null or wrongly typed field becomes an
//! empty value instead of failing the whole catalog.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    /// `None` when the label does not say
    #[serde(default, deserialize_with = "lenient_tristate")]
    pub contains_grain: Option<bool>,
    /// Named protein sources in label order
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub protein_sources: Vec<String>,
    /// Semicolon-delimited ingredient list in label order
    #[serde(default, deserialize_with = "lenient_ingredients")]
    pub ingredients_list: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Products(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

impl ProductRecord {
    /// Create a record with only an id and a name set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decode a catalog from JSON.
    ///
    /// Accepts a top-level array of products or an object with a `products`
    /// array.
    pub fn from_json_catalog(json: &str) -> Result<Vec<ProductRecord>> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(match document {
            CatalogDocument::Products(products) => products,
            CatalogDocument::Wrapped { products } => products,
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

fn lenient_tristate<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::String(s) => s
            .split([';', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_ingredients<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(";"),
        other => scalar_to_string(&other).unwrap_or_default(),
    })
}
