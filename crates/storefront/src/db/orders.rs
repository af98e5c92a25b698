//! Order repository.
//!
//! Orders are written once, in a single transaction covering the order row
//! and its line items, and never change afterwards except for the payment
//! status column.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use pawmart_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::checkout::OrderStore;
use crate::models::order::{LineItem, NewOrder, Order, Recipient};

const ORDER_COLUMNS: &str =
    "id, status, created_at, first_name, last_name, city, zip_code, total_price";

/// Repository for persisted orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    status: String,
    created_at: DateTime<Utc>,
    first_name: String,
    last_name: String,
    city: String,
    zip_code: i32,
    total_price: Decimal,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: OrderId,
    title: String,
    slug: String,
    unit_price: Decimal,
    quantity: i64,
    line_total: Decimal,
}

impl OrderRow {
    fn into_order(self, items: Vec<LineItem>) -> Result<Order, RepositoryError> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Order {
            id: self.id,
            items,
            status,
            created_at: self.created_at,
            recipient: Recipient {
                first_name: self.first_name,
                last_name: self.last_name,
                city: self.city,
                zip_code: self.zip_code,
            },
            total_price: self.total_price,
        })
    }
}

impl TryFrom<ItemRow> for LineItem {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "order {} has line quantity {}",
                row.order_id, row.quantity
            ))
        })?;

        Ok(Self {
            title: row.title,
            slug: row.slug,
            unit_price: row.unit_price,
            quantity,
            line_total: row.line_total,
        })
    }
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if stored rows are invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT order_id, title, slug, unit_price, quantity, line_total \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(LineItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(row.into_order(items)?))
    }

    /// List all orders, newest first, with their line items.
    ///
    /// Line items are fetched in one batched query, not per order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if stored rows are invalid.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();
        let item_rows = sqlx::query_as::<_, ItemRow>(
            "SELECT order_id, title, slug, unit_price, quantity, line_total \
             FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: std::collections::HashMap<OrderId, Vec<LineItem>> =
            std::collections::HashMap::new();
        for item_row in item_rows {
            let order_id = item_row.order_id;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(LineItem::try_from(item_row)?);
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }

    /// Record the payment provider's verdict for an order.
    ///
    /// Returns whether the order existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl OrderStore for OrderRepository<'_> {
    async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO orders (status, created_at, first_name, last_name, city, zip_code, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(&order.recipient.first_name)
        .bind(&order.recipient.last_name)
        .bind(&order.recipient.city)
        .bind(order.recipient.zip_code)
        .bind(order.total_price)
        .fetch_one(&mut *tx)
        .await?;

        let order_id = OrderId::new(id);

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, title, slug, unit_price, quantity, line_total) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(order_id)
            .bind(&item.title)
            .bind(&item.slug)
            .bind(item.unit_price)
            .bind(i64::from(item.quantity))
            .bind(item.line_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(order_id)
    }
}
