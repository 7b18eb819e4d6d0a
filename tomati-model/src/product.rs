//! Product listings and their query/mutation payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A classified listing published by a seller.
///
/// `like_count` is a denormalized cache of the like records for the
/// product and is only ever written by the promotion engine, which
/// recomputes it from the authoritative like set. `is_promoted` is
/// monotonic: once set it never reverts, and `promoted_at` records the
/// single moment of the transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Free-form price text, e.g. "250 TND"; `is_free` listings keep it empty
    pub price: String,
    pub location: String,
    pub image_url: Option<String>,
    pub category: String,
    pub like_count: i64,
    pub view_count: i64,
    pub is_reserved: bool,
    pub is_free: bool,
    pub is_promoted: bool,
    pub promoted_at: Option<DateTime<Utc>>,
    /// Owner (seller) of the listing
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a listing. The owner comes from the
/// authenticated caller, never from the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: String,
    pub location: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub is_free: bool,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("location is required".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category is required".to_string());
        }
        if !self.is_free && self.price.trim().is_empty() {
            return Err("price is required for paid listings".to_string());
        }
        Ok(())
    }
}

/// Partial update applied to an existing listing; absent fields are
/// left untouched. Promotion fields are deliberately not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_reserved: Option<bool>,
    pub is_free: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.image_url.is_none()
            && self.category.is_none()
            && self.is_reserved.is_none()
            && self.is_free.is_none()
    }
}

/// Catalog query filters, bound from the listing endpoint's query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive needle matched against title, description,
    /// category and location
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_requires_price_unless_free() {
        let mut listing = NewProduct {
            title: "Vélo de ville".to_string(),
            description: None,
            price: String::new(),
            location: "Tunis".to_string(),
            image_url: None,
            category: "sport".to_string(),
            is_free: false,
        };
        assert!(listing.validate().is_err());

        listing.is_free = true;
        assert!(listing.validate().is_ok());
    }

    #[test]
    fn filter_defaults_apply_when_query_is_empty() {
        let filter: ProductFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.offset, 0);
        assert!(filter.category.is_none());
    }
}
