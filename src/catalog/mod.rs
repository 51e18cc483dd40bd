use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod fetch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub products: Vec<Product>,
}

// Catalog files in the wild carry numeric ids; the app keys everything by string.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(value) => value.to_string(),
        RawId::Text(value) => value,
    })
}

#[derive(Debug, Clone)]
pub enum CatalogError {
    Unavailable { source: String, message: String },
    Malformed { source: String, message: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { source, message } => {
                write!(f, "catalog unavailable at {source}: {message}")
            }
            Self::Malformed { source, message } => {
                write!(f, "catalog at {source} is malformed: {message}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

pub fn parse_catalog(source: &str, bytes: &[u8]) -> Result<Vec<Product>, CatalogError> {
    let document: CatalogDocument =
        serde_json::from_slice(bytes).map_err(|err| CatalogError::Malformed {
            source: source.to_string(),
            message: err.to_string(),
        })?;
    Ok(document.products)
}

/// Exact match on the category field, original order preserved. No case
/// normalization, no partial matching.
pub fn filter_by_category(products: &[Product], category: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|product| product.category == category)
        .cloned()
        .collect()
}

/// Distinct category values in first-seen order, used to populate the
/// category selector.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|known| known == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
