//! # SQLite Backend
//!
//! Implements every collaborator trait by delegating to the bodega-db
//! repositories. This is the only file where the pipeline's seams and
//! the storage layer meet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bodega_core::{CartItem, CheckoutBatch, Order, Product, User};
use bodega_db::{Database, DbError};

use crate::error::{CheckoutError, CheckoutResult};
use crate::traits::{
    CartStore, CatalogReader, ConfigFlags, NotificationSink, OrderStore, SessionResolver,
    UserDirectory,
};

/// The production backend: one [`Database`] handle behind all seams.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    /// Wraps a database handle.
    pub fn new(db: Database) -> Self {
        SqliteBackend { db }
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl SessionResolver for SqliteBackend {
    async fn resolve(&self, token: &str) -> CheckoutResult<Option<String>> {
        Ok(self.db.sessions().resolve(token).await?)
    }
}

#[async_trait]
impl UserDirectory for SqliteBackend {
    async fn user_by_id(&self, user_id: &str) -> CheckoutResult<User> {
        Ok(self.db.users().get_by_id(user_id).await?)
    }
}

#[async_trait]
impl CatalogReader for SqliteBackend {
    async fn active_product(&self, product_id: &str) -> CheckoutResult<Option<Product>> {
        Ok(self.db.products().get_active(product_id).await?)
    }
}

#[async_trait]
impl CartStore for SqliteBackend {
    async fn items_for(&self, user_id: &str, now: DateTime<Utc>) -> CheckoutResult<Vec<CartItem>> {
        Ok(self.db.carts().items_for(user_id, now).await?)
    }

    async fn total_units(&self, user_id: &str, now: DateTime<Utc>) -> CheckoutResult<i64> {
        Ok(self.db.carts().total_units(user_id, now).await?)
    }

    async fn upsert_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> CheckoutResult<CartItem> {
        Ok(self
            .db
            .carts()
            .upsert_item(user_id, product_id, quantity, now)
            .await?)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> CheckoutResult<u64> {
        Ok(self.db.carts().sweep_expired(now).await?)
    }
}

#[async_trait]
impl ConfigFlags for SqliteBackend {
    async fn sales_suspended(&self, now: DateTime<Utc>) -> CheckoutResult<bool> {
        Ok(self.db.config().is_sales_suspended(now).await?)
    }
}

#[async_trait]
impl OrderStore for SqliteBackend {
    async fn count_deliveries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CheckoutResult<i64> {
        Ok(self.db.orders().count_deliveries_between(start, end).await?)
    }

    async fn commit(&self, batch: &CheckoutBatch) -> CheckoutResult<()> {
        // Conflict errors carry a business meaning; everything else is
        // infrastructure.
        self.db
            .checkout()
            .commit_batch(batch)
            .await
            .map_err(|err| match err {
                DbError::StockConflict {
                    product_id,
                    available,
                    requested,
                } => CheckoutError::InsufficientStock {
                    product_id,
                    available,
                    requested,
                },
                DbError::CreditConflict { .. } => CheckoutError::CreditConflict,
                other => CheckoutError::Storage(other),
            })
    }

    async fn orders_delivering_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CheckoutResult<Vec<Order>> {
        Ok(self
            .db
            .orders()
            .orders_delivering_between(start, end)
            .await?)
    }

    async fn reschedule(&self, order_id: &str, delivery_at: DateTime<Utc>) -> CheckoutResult<()> {
        Ok(self.db.orders().reschedule_delivery(order_id, delivery_at).await?)
    }
}

#[async_trait]
impl NotificationSink for SqliteBackend {
    async fn notify(
        &self,
        user_id: Option<&str>,
        message: &str,
        kind: &str,
    ) -> CheckoutResult<()> {
        self.db.notices().insert(user_id, message, kind).await?;
        Ok(())
    }
}
