//! Product model, creation payload, typed patch, and listing filter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pawmart_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// URL-safe identifier derived from the title at creation time.
    pub slug: String,
    pub price: Price,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product. The slug is derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for a product.
///
/// Only fields that are `Some` are written; everything else is left
/// untouched. The slug is stable for the product's lifetime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub retail_price: Option<Decimal>,
    pub wholesale_price: Option<Decimal>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    /// True if the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.retail_price.is_none()
            && self.wholesale_price.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }
}

/// Listing filter. All criteria are optional and combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Exact tag membership.
    pub tag: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Retail price strictly above this bound.
    pub price_gt: Option<Decimal>,
    /// Retail price strictly below this bound.
    pub price_lt: Option<Decimal>,
}

/// Derive a URL-safe slug from a product title.
///
/// Lowercases, maps runs of non-alphanumeric characters to single dashes,
/// and trims leading/trailing dashes.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Salmon Crunch Bites"), "salmon-crunch-bites");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Fish & Chips -- Deluxe!"), "fish-chips-deluxe");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Chew Toy  "), "chew-toy");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        let patch = ProductPatch {
            category: Some("for dogs".to_string()),
            ..ProductPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
