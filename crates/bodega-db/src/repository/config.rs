//! # Config Repository
//!
//! Store-wide flags kept in a key/value table.
//!
//! ## Flags
//! - `sales_suspended` - "1" blocks every checkout at the gate
//! - `sales_suspended_until` - optional RFC 3339 moment; once it passes,
//!   the suspension reads as lifted without an explicit clear

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Repository for store configuration flags.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    pool: SqlitePool,
}

impl ConfigRepository {
    /// Creates a new ConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConfigRepository { pool }
    }

    /// Reads a raw config value.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM config WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Writes a config value (upsert).
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO config (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Whether sales are suspended at `now`.
    ///
    /// A suspension with a lapsed `sales_suspended_until` counts as
    /// lifted even though the flag still reads "1".
    pub async fn is_sales_suspended(&self, now: DateTime<Utc>) -> DbResult<bool> {
        let flag = self.get("sales_suspended").await?;
        if flag.as_deref() != Some("1") {
            return Ok(false);
        }

        match self.get("sales_suspended_until").await? {
            Some(raw) => match raw.parse::<DateTime<Utc>>() {
                Ok(until) => Ok(now < until),
                // Unparseable deadline: treat as indefinite
                Err(_) => Ok(true),
            },
            None => Ok(true),
        }
    }

    /// Suspends or resumes sales, optionally with an automatic end.
    pub async fn set_sales_suspended(
        &self,
        suspended: bool,
        until: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        self.set("sales_suspended", if suspended { "1" } else { "0" })
            .await?;

        match until {
            Some(until) if suspended => {
                self.set("sales_suspended_until", &until.to_rfc3339()).await?;
            }
            _ => {
                sqlx::query("DELETE FROM config WHERE key = 'sales_suspended_until'")
                    .execute(&self.pool)
                    .await?;
            }
        }

        info!(suspended, ?until, "Sales suspension flag updated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_default_not_suspended() {
        let db = test_db().await;
        assert!(!db.config().is_sales_suspended(Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_indefinite_suspension() {
        let db = test_db().await;
        let repo = db.config();

        repo.set_sales_suspended(true, None).await.unwrap();
        assert!(repo.is_sales_suspended(Utc::now()).await.unwrap());

        repo.set_sales_suspended(false, None).await.unwrap();
        assert!(!repo.is_sales_suspended(Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_timed_suspension_lapses() {
        let db = test_db().await;
        let repo = db.config();
        let now = Utc::now();

        repo.set_sales_suspended(true, Some(now + Duration::hours(2)))
            .await
            .unwrap();

        assert!(repo.is_sales_suspended(now).await.unwrap());
        assert!(!repo
            .is_sales_suspended(now + Duration::hours(3))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_raw_get_set() {
        let db = test_db().await;
        let repo = db.config();

        assert_eq!(repo.get("missing").await.unwrap(), None);
        repo.set("greeting", "hola").await.unwrap();
        repo.set("greeting", "buenas").await.unwrap();
        assert_eq!(repo.get("greeting").await.unwrap().as_deref(), Some("buenas"));
    }
}
