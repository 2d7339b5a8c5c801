//! # Notice Repository
//!
//! User-facing notices (reschedules, store announcements).
//!
//! A notice with `user_id = NULL` is a broadcast visible to everyone.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use bodega_core::Notice;

/// Repository for notices.
#[derive(Debug, Clone)]
pub struct NoticeRepository {
    pool: SqlitePool,
}

impl NoticeRepository {
    /// Creates a new NoticeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NoticeRepository { pool }
    }

    /// Inserts a notice.
    ///
    /// ## Arguments
    /// * `user_id` - `None` for a store-wide broadcast
    /// * `kind` - Free-form tag ("info", "reschedule", ...)
    pub async fn insert(
        &self,
        user_id: Option<&str>,
        message: &str,
        kind: &str,
    ) -> DbResult<Notice> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO notices (id, user_id, message, kind, created_at, is_read)
            VALUES (?1, ?2, ?3, ?4, ?5, 0)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(message)
        .bind(kind)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(notice_id = %id, kind = %kind, "Notice created");

        let notice = sqlx::query_as::<_, Notice>(
            r#"
            SELECT id, user_id, message, kind, created_at, is_read
            FROM notices
            WHERE id = ?1
            "#,
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notice)
    }

    /// Lists notices visible to a user (their own plus broadcasts),
    /// newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Notice>> {
        let notices = sqlx::query_as::<_, Notice>(
            r#"
            SELECT id, user_id, message, kind, created_at, is_read
            FROM notices
            WHERE user_id = ?1 OR user_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notices)
    }

    /// Marks a notice as read.
    pub async fn mark_read(&self, id: &str) -> DbResult<()> {
        sqlx::query("UPDATE notices SET is_read = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

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

    #[tokio::test]
    async fn test_user_sees_own_and_broadcast() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert("nadia", "51234567", "Calle 1", None, false)
            .await
            .unwrap();
        let other = db
            .users()
            .insert("otro", "59876543", "Calle 2", None, false)
            .await
            .unwrap();

        let repo = db.notices();
        repo.insert(Some(&user.id), "Tu entrega cambió", "reschedule")
            .await
            .unwrap();
        repo.insert(Some(&other.id), "Privado", "info").await.unwrap();
        repo.insert(None, "Cerramos el lunes", "info").await.unwrap();

        let visible = repo.list_for_user(&user.id).await.unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|n| n.message != "Privado"));
    }

    #[tokio::test]
    async fn test_mark_read() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.notices();

        let notice = repo.insert(None, "Aviso", "info").await.unwrap();
        assert!(!notice.is_read);

        repo.mark_read(&notice.id).await.unwrap();
        let visible = repo.list_for_user("anyone").await.unwrap();
        assert!(visible[0].is_read);
    }
}
