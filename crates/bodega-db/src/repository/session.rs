//! # Session Repository
//!
//! Opaque session tokens mapping to user identities.
//!
//! ## Token Model
//! A token is a random UUID string handed to the client at login. The
//! checkout flow resolves it exactly once per request and pins the
//! resulting user ID for the rest of the flow, so a logout mid-checkout
//! cannot switch identities halfway through.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// Repository for session token operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Creates a session for a user and returns the new token.
    pub async fn create(&self, user_id: &str) -> DbResult<String> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user_id, "Session created");
        Ok(token)
    }

    /// Resolves a token to a user ID.
    ///
    /// ## Returns
    /// * `Ok(Some(user_id))` - Token is live
    /// * `Ok(None)` - Token unknown or already revoked
    pub async fn resolve(&self, token: &str) -> DbResult<Option<String>> {
        let user_id: Option<String> = sqlx::query_scalar(
            "SELECT user_id FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    /// Revokes a single session (logout).
    ///
    /// Revoking an unknown token is a no-op, not an error.
    pub async fn revoke(&self, token: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        debug!("Session revoked");
        Ok(())
    }

    /// Revokes all sessions for a user.
    ///
    /// ## Usage
    /// Called when an account is suspended so the suspension takes
    /// effect immediately.
    pub async fn revoke_for_user(&self, user_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id = %user_id, count = result.rows_affected(), "Sessions revoked");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn db_with_user() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert("tester", "51234567", "Calle 1", None, false)
            .await
            .unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let (db, user_id) = db_with_user().await;
        let repo = db.sessions();

        let token = repo.create(&user_id).await.unwrap();
        assert_eq!(repo.resolve(&token).await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let (db, _) = db_with_user().await;
        assert_eq!(db.sessions().resolve("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke() {
        let (db, user_id) = db_with_user().await;
        let repo = db.sessions();

        let token = repo.create(&user_id).await.unwrap();
        repo.revoke(&token).await.unwrap();
        assert_eq!(repo.resolve(&token).await.unwrap(), None);

        // Revoking again is a no-op
        repo.revoke(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_for_user() {
        let (db, user_id) = db_with_user().await;
        let repo = db.sessions();

        let t1 = repo.create(&user_id).await.unwrap();
        let t2 = repo.create(&user_id).await.unwrap();

        let revoked = repo.revoke_for_user(&user_id).await.unwrap();
        assert_eq!(revoked, 2);
        assert_eq!(repo.resolve(&t1).await.unwrap(), None);
        assert_eq!(repo.resolve(&t2).await.unwrap(), None);
    }
}
