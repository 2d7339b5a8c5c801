//! # User Repository
//!
//! Database operations for customer accounts.
//!
//! ## Key Operations
//! - Account lookup (by ID, by unique name)
//! - Credit grants (credit DEBITS happen in the checkout transaction)
//! - Suspension and reactivation
//! - Coordinate updates with the delivery-range flag
//!
//! ## Credit Invariant
//! `credit_cents >= 0` is enforced by a CHECK constraint; the grant path
//! here only adds, and the checkout transaction debits conditionally.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::User;

/// Repository for user account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

const USER_COLUMNS: &str = r#"
    id, name, phone, address, lat, lon, in_range,
    credit_cents, status, suspended_until, created_at
"#;

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user account.
    ///
    /// ## Arguments
    /// * `name` - Unique display name
    /// * `phone` - Already validated by `bodega_core::validation::validate_phone`
    /// * `address` - Free-form delivery address
    /// * `coordinates` - Optional (lat, lon); `in_range` is the caller's
    ///   geofence verdict for those coordinates (false when absent)
    pub async fn insert(
        &self,
        name: &str,
        phone: &str,
        address: &str,
        coordinates: Option<(f64, f64)>,
        in_range: bool,
    ) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let (lat, lon) = match coordinates {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };

        debug!(user_id = %id, name = %name, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, phone, address, lat, lon, in_range,
                               credit_cents, status, suspended_until, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 'active', NULL, ?8)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(lat)
        .bind(lon)
        .bind(in_range)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: name.to_string(),
            },
            other => other,
        })?;

        self.get_by_id(&id).await
    }

    /// Fetches a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| DbError::not_found("User", id))
    }

    /// Fetches a user by unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Adds credit to a user's balance.
    ///
    /// ## Arguments
    /// * `amount_cents` - Must be positive; debits only happen inside the
    ///   checkout transaction.
    pub async fn grant_credit(&self, id: &str, amount_cents: i64) -> DbResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET credit_cents = credit_cents + ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(user_id = %id, amount_cents, "Credit granted");
        self.get_by_id(id).await
    }

    /// Suspends a user, optionally until a given moment.
    ///
    /// ## Arguments
    /// * `until` - `None` means indefinite; a past `until` reads as
    ///   already active (see `User::is_suspended`).
    pub async fn suspend(&self, id: &str, until: Option<DateTime<Utc>>) -> DbResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = 'suspended', suspended_until = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(until)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(user_id = %id, ?until, "User suspended");
        self.get_by_id(id).await
    }

    /// Lifts a suspension.
    pub async fn reactivate(&self, id: &str) -> DbResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = 'active', suspended_until = NULL
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        info!(user_id = %id, "User reactivated");
        self.get_by_id(id).await
    }

    /// Updates stored coordinates and the delivery-range flag.
    ///
    /// The `in_range` verdict comes from the caller's geofence check so
    /// the store center and radius stay out of the database layer.
    pub async fn update_coordinates(
        &self,
        id: &str,
        lat: f64,
        lon: f64,
        in_range: bool,
    ) -> DbResult<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET lat = ?2, lon = ?3, in_range = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(lat)
        .bind(lon)
        .bind(in_range)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        debug!(user_id = %id, lat, lon, in_range, "User coordinates updated");
        self.get_by_id(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bodega_core::AccountStatus;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .insert("maria", "+5351234567", "Calle 23 #456", Some((23.12, -82.36)), true)
            .await
            .unwrap();

        assert_eq!(user.name, "maria");
        assert!(user.in_range);
        assert_eq!(user.credit_cents, 0);
        assert_eq!(user.status, AccountStatus::Active);

        let by_name = repo.get_by_name("maria").await.unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert("pedro", "51112222", "Calle 1", None, false)
            .await
            .unwrap();
        let err = repo
            .insert("pedro", "53334444", "Calle 2", None, false)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_grant_credit_accumulates() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .insert("ana", "52223333", "Calle 5", None, false)
            .await
            .unwrap();

        repo.grant_credit(&user.id, 10_00).await.unwrap();
        let user = repo.grant_credit(&user.id, 5_00).await.unwrap();

        assert_eq!(user.credit_cents, 15_00);
    }

    #[tokio::test]
    async fn test_suspend_and_reactivate() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .insert("luis", "54445555", "Calle 9", None, false)
            .await
            .unwrap();

        let suspended = repo.suspend(&user.id, None).await.unwrap();
        assert_eq!(suspended.status, AccountStatus::Suspended);
        assert!(suspended.is_suspended(Utc::now()));

        let active = repo.reactivate(&user.id).await.unwrap();
        assert_eq!(active.status, AccountStatus::Active);
        assert!(!active.is_suspended(Utc::now()));
    }

    #[tokio::test]
    async fn test_lapsed_suspension_reads_active() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo
            .insert("rosa", "56667777", "Calle 12", None, false)
            .await
            .unwrap();

        let past = Utc::now() - chrono::Duration::hours(1);
        let suspended = repo.suspend(&user.id, Some(past)).await.unwrap();

        // Row says suspended, but the window has lapsed
        assert_eq!(suspended.status, AccountStatus::Suspended);
        assert!(!suspended.is_suspended(Utc::now()));
    }
}
