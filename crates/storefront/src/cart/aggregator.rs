//! Priced, human-facing view of the raw cart entries.
//!
//! The snapshot is computed fresh on every read and never stored; the
//! sorted set in Redis stays the single source of truth.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use pawmart_core::{ProductId, SessionKey};

use super::{CartError, CartStore, ProductLookup};
use crate::models::order::LineItem;

/// An itemized cart view with a grand total.
///
/// Invariants: `grand_total` is the sum of the items' `line_total`s, and
/// every `line_total` is `quantity * unit_price` at the quantity-tiered
/// unit price.
#[derive(Debug, Clone, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub grand_total: Decimal,
}

/// Turns raw [`CartStore`] entries into a [`CartSnapshot`].
///
/// Holds its product-resolution capability by composition; all ids in a
/// cart are resolved in a single batched lookup.
pub struct CartAggregator<S, P> {
    store: S,
    products: P,
}

impl<S: CartStore, P: ProductLookup> CartAggregator<S, P> {
    /// Create an aggregator over a cart store and a product lookup.
    pub const fn new(store: S, products: P) -> Self {
        Self { store, products }
    }

    /// The underlying cart store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Compute the session's priced cart view.
    ///
    /// Returns `Ok(None)` for an empty cart - explicitly distinguishable
    /// from a snapshot whose totals happen to be zero. A cart whose
    /// entries all point at since-deleted products also reads as empty.
    ///
    /// Entries referencing a product that no longer resolves are logged
    /// and dropped from both the items and the total; catalog churn never
    /// fails a cart read.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the cart read or the product lookup fails.
    pub async fn snapshot(&self, session: &SessionKey) -> Result<Option<CartSnapshot>, CartError> {
        let entries = self.store.entries(session).await?;
        if entries.is_empty() {
            return Ok(None);
        }

        let ids: Vec<ProductId> = entries.iter().map(|(id, _)| *id).collect();
        let products = self.products.by_ids(&ids).await?;
        if products.is_empty() {
            return Ok(None);
        }

        let by_id: HashMap<ProductId, _> = products.iter().map(|p| (p.id, p)).collect();

        let mut items = Vec::with_capacity(entries.len());
        let mut grand_total = Decimal::ZERO;

        for (id, qty) in entries {
            let Some(product) = by_id.get(&id) else {
                tracing::warn!(
                    product_id = %id,
                    %session,
                    "cart references a product that no longer exists; dropping line"
                );
                continue;
            };

            let line_total = product.price.line_total(qty);
            grand_total += line_total;
            items.push(LineItem {
                title: product.title.clone(),
                slug: product.slug.clone(),
                unit_price: product.price.unit_price(qty),
                quantity: qty,
                line_total,
            });
        }

        Ok(Some(CartSnapshot { items, grand_total }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::dec;
    use std::sync::Mutex;

    use pawmart_core::Price;

    use crate::db::RepositoryError;
    use crate::models::Product;

    /// Additive in-memory stand-in for the Redis store.
    #[derive(Default)]
    struct InMemoryCart {
        entries: Mutex<Vec<(ProductId, u32)>>,
    }

    #[async_trait]
    impl CartStore for InMemoryCart {
        async fn add(
            &self,
            _session: &SessionKey,
            product: ProductId,
            qty: u32,
        ) -> Result<(), CartError> {
            if qty == 0 {
                return Err(CartError::ZeroQuantity);
            }
            let mut entries = self.entries.lock().unwrap();
            if let Some(entry) = entries.iter_mut().find(|(id, _)| *id == product) {
                entry.1 += qty;
            } else {
                entries.push((product, qty));
            }
            Ok(())
        }

        async fn remove(&self, _session: &SessionKey, product: ProductId) -> Result<(), CartError> {
            self.entries.lock().unwrap().retain(|(id, _)| *id != product);
            Ok(())
        }

        async fn clear(&self, _session: &SessionKey) -> Result<(), CartError> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }

        async fn entries(&self, _session: &SessionKey) -> Result<Vec<(ProductId, u32)>, CartError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    /// Fixed catalog resolving only the products it was given.
    struct FixedCatalog(Vec<Product>);

    #[async_trait]
    impl ProductLookup for FixedCatalog {
        async fn by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect())
        }
    }

    fn product(id: i32, title: &str, retail: Decimal, wholesale: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            slug: title.to_lowercase().replace(' ', "-"),
            price: Price::new(retail, wholesale),
            category: "for dogs".to_string(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn session() -> SessionKey {
        SessionKey::from("s1")
    }

    #[tokio::test]
    async fn test_empty_cart_is_the_empty_marker() {
        let aggregator = CartAggregator::new(InMemoryCart::default(), FixedCatalog(vec![]));
        let snapshot = aggregator.snapshot(&session()).await.unwrap();
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn test_additive_quantities_price_as_one_line() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(1), 3).await.unwrap();
        cart.add(&session(), ProductId::new(1), 2).await.unwrap();
        assert_eq!(
            cart.entries(&session()).await.unwrap(),
            vec![(ProductId::new(1), 5)]
        );

        let catalog = FixedCatalog(vec![product(1, "Beef Jerky", dec!(20), dec!(12))]);
        let aggregator = CartAggregator::new(cart, catalog);

        let snapshot = aggregator.snapshot(&session()).await.unwrap().unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].quantity, 5);
        assert_eq!(snapshot.items[0].unit_price, dec!(20));
        assert_eq!(snapshot.grand_total, dec!(100));
    }

    #[tokio::test]
    async fn test_crossing_the_tier_reprices_the_whole_line() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(1), 3).await.unwrap();

        let catalog = FixedCatalog(vec![product(1, "Salmon Bites", dec!(100), dec!(50))]);
        let aggregator = CartAggregator::new(cart, catalog);

        let snapshot = aggregator.snapshot(&session()).await.unwrap().unwrap();
        assert_eq!(snapshot.grand_total, dec!(300));

        // Seven more units push the line to ten; the whole line re-prices
        // at wholesale, not just the increment.
        aggregator
            .store()
            .add(&session(), ProductId::new(1), 7)
            .await
            .unwrap();

        let snapshot = aggregator.snapshot(&session()).await.unwrap().unwrap();
        assert_eq!(snapshot.items[0].unit_price, dec!(50));
        assert_eq!(snapshot.grand_total, dec!(500));
    }

    #[tokio::test]
    async fn test_grand_total_is_the_sum_of_line_totals() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(1), 2).await.unwrap();
        cart.add(&session(), ProductId::new(2), 12).await.unwrap();
        cart.add(&session(), ProductId::new(3), 9).await.unwrap();

        let catalog = FixedCatalog(vec![
            product(1, "Chew Toy", dec!(7.50), dec!(5)),
            product(2, "Cat Litter", dec!(18), dec!(11)),
            product(3, "Fish Flakes", dec!(4.99), dec!(3.10)),
        ]);
        let aggregator = CartAggregator::new(cart, catalog);

        let snapshot = aggregator.snapshot(&session()).await.unwrap().unwrap();
        let summed: Decimal = snapshot.items.iter().map(|i| i.line_total).sum();
        assert_eq!(snapshot.grand_total, summed);
        assert_eq!(snapshot.grand_total, dec!(15) + dec!(132) + dec!(44.91));
    }

    #[tokio::test]
    async fn test_missing_product_is_dropped_from_items_and_total() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(1), 1).await.unwrap();
        cart.add(&session(), ProductId::new(99), 4).await.unwrap();

        let catalog = FixedCatalog(vec![product(1, "Bird Seed", dec!(6), dec!(4))]);
        let aggregator = CartAggregator::new(cart, catalog);

        let snapshot = aggregator.snapshot(&session()).await.unwrap().unwrap();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].slug, "bird-seed");
        assert_eq!(snapshot.grand_total, dec!(6));
    }

    #[tokio::test]
    async fn test_cart_of_only_missing_products_reads_as_empty() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(99), 4).await.unwrap();

        let aggregator = CartAggregator::new(cart, FixedCatalog(vec![]));
        assert!(aggregator.snapshot(&session()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_then_entries_is_empty() {
        let cart = InMemoryCart::default();
        cart.add(&session(), ProductId::new(1), 3).await.unwrap();
        cart.clear(&session()).await.unwrap();
        assert!(cart.entries(&session()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_any_write() {
        let cart = InMemoryCart::default();
        let err = cart.add(&session(), ProductId::new(1), 0).await.unwrap_err();
        assert!(matches!(err, CartError::ZeroQuantity));
        assert!(cart.entries(&session()).await.unwrap().is_empty());
    }
}
