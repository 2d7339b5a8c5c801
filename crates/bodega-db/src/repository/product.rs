//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Active-catalog listing (what the storefront shows)
//! - Per-product discount and price updates
//! - Stock visibility (low-stock report)
//!
//! ## Stock Writes
//! Stock DECREMENTS happen only inside [`crate::repository::checkout`],
//! as conditional updates within the commit transaction. This repository
//! only performs restocks and administrative adjustments.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::Product;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let catalog = repo.list_active().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns it.
    ///
    /// ## Arguments
    /// * `name` - Display name
    /// * `description` - Optional longer text
    /// * `price_cents` - List price in cents (before discount)
    /// * `available_qty` - Initial stock on hand
    /// * `discount_bps` - Per-product discount in basis points (0..=10000)
    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        price_cents: i64,
        available_qty: i64,
        discount_bps: u32,
    ) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(product_id = %id, name = %name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, available_qty,
                                  discount_bps, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(available_qty)
        .bind(discount_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    /// Fetches a product by ID.
    ///
    /// Returns `DbError::NotFound` if the ID doesn't exist.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, available_qty,
                   discount_bps, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Fetches a product only if it is active.
    ///
    /// ## Usage
    /// Cart validation: an inactive product must read as "unavailable",
    /// not "not found", so the caller distinguishes `Ok(None)` from a
    /// genuinely missing row.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, available_qty,
                   discount_bps, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all active products, sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, available_qty,
                   discount_bps, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates price and discount for a product.
    pub async fn update_pricing(
        &self,
        id: &str,
        price_cents: i64,
        discount_bps: u32,
    ) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET price_cents = ?2, discount_bps = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(discount_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(product_id = %id, price_cents, discount_bps, "Product pricing updated");
        self.get_by_id(id).await
    }

    /// Adds units to a product's stock (restock).
    ///
    /// ## Arguments
    /// * `units` - Must be positive; decrements go through the checkout
    ///   transaction instead.
    pub async fn restock(&self, id: &str, units: i64) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET available_qty = available_qty + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(units)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(product_id = %id, units, "Product restocked");
        self.get_by_id(id).await
    }

    /// Soft-deletes a product (hides it from the catalog).
    ///
    /// Existing order lines keep referencing it; carts referencing it
    /// fail validation at checkout.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(product_id = %id, "Product deactivated");
        Ok(())
    }

    /// Lists active products at or below a stock threshold.
    ///
    /// ## Usage
    /// Restock report for the store operator.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price_cents, available_qty,
                   discount_bps, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1 AND available_qty <= ?1
            ORDER BY available_qty ASC, name
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
