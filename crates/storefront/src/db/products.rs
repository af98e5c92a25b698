//! Product repository.
//!
//! Lookups return `Option<Product>`; absence is an expected outcome, not
//! an error. Batch lookups exist so callers pricing a whole cart never
//! fan out into per-product queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use pawmart_core::{Price, ProductId};

use super::RepositoryError;
use crate::cart::ProductLookup;
use crate::models::product::{NewProduct, Product, ProductFilter, ProductPatch, slugify};

const PRODUCT_COLUMNS: &str =
    "id, title, description, slug, retail_price, wholesale_price, category, tags, created_at";

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    description: String,
    slug: String,
    retail_price: Decimal,
    wholesale_price: Decimal,
    category: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            slug: row.slug,
            price: Price::new(row.retail_price, row.wholesale_price),
            category: row.category,
            tags: row.tags,
            created_at: row.created_at,
        }
    }
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product, deriving its slug from the title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product with the same slug
    /// already exists, `RepositoryError::Database` for other failures.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let slug = slugify(&new.title);

        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (title, description, slug, retail_price, wholesale_price, category, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, title, description, slug, retail_price, wholesale_price, category, tags, created_at",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&slug)
        .bind(new.price.retail)
        .bind(new.price.wholesale)
        .bind(&new.category)
        .bind(&new.tags)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, &slug))?;

        Ok(row.into())
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Batch-fetch products by slug (bookmark resolution).
    ///
    /// Missing slugs are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_slugs(&self, slugs: &[String]) -> Result<Vec<Product>, RepositoryError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = ANY($1)"
        ))
        .bind(slugs)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List products matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        let mut prefix = " WHERE ";

        if let Some(title) = &filter.title {
            query.push(prefix).push("title ILIKE ");
            query.push_bind(format!("%{title}%"));
            prefix = " AND ";
        }
        if let Some(tag) = &filter.tag {
            query.push(prefix);
            query.push_bind(tag.clone());
            query.push(" = ANY(tags)");
            prefix = " AND ";
        }
        if let Some(category) = &filter.category {
            query.push(prefix).push("category = ");
            query.push_bind(category.clone());
            prefix = " AND ";
        }
        if let Some(bound) = filter.price_gt {
            query.push(prefix).push("retail_price > ");
            query.push_bind(bound);
            prefix = " AND ";
        }
        if let Some(bound) = filter.price_lt {
            query.push(prefix).push("retail_price < ");
            query.push_bind(bound);
        }

        query.push(" ORDER BY created_at DESC");

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Apply a typed patch to the product with the given slug.
    ///
    /// Returns the updated product, or `None` if no product has that slug.
    /// An empty patch reads the product back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        slug: &str,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        if patch.is_empty() {
            return self.by_slug(slug).await;
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE products SET ");
        let mut sets = query.separated(", ");

        if let Some(title) = &patch.title {
            sets.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(description) = &patch.description {
            sets.push("description = ")
                .push_bind_unseparated(description.clone());
        }
        if let Some(retail) = patch.retail_price {
            sets.push("retail_price = ").push_bind_unseparated(retail);
        }
        if let Some(wholesale) = patch.wholesale_price {
            sets.push("wholesale_price = ")
                .push_bind_unseparated(wholesale);
        }
        if let Some(category) = &patch.category {
            sets.push("category = ")
                .push_bind_unseparated(category.clone());
        }
        if let Some(tags) = &patch.tags {
            sets.push("tags = ").push_bind_unseparated(tags.clone());
        }

        query.push(" WHERE slug = ");
        query.push_bind(slug);
        query.push(format!(" RETURNING {PRODUCT_COLUMNS}"));

        let row: Option<ProductRow> = query.build_query_as().fetch_optional(self.pool).await?;
        Ok(row.map(Product::from))
    }

    /// Delete the product with the given slug.
    ///
    /// Returns whether a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, slug: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE slug = $1")
            .bind(slug)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ProductLookup for ProductRepository<'_> {
    async fn by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}

fn conflict_on_unique(err: sqlx::Error, slug: &str) -> RepositoryError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        RepositoryError::Conflict(format!("product slug already exists: {slug}"))
    } else {
        RepositoryError::Database(err)
    }
}
