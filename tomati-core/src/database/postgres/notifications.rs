use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::ports::notifications::NotificationRepository;
use crate::error::{MarketError, Result};
use tomati_model::notification::{Notification, NotificationKind};

#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: &PgRow) -> Result<Notification> {
        let read = |e: sqlx::Error| {
            MarketError::Internal(format!(
                "Failed to read notification row: {e}"
            ))
        };

        let kind: String = row.try_get("kind").map_err(read)?;
        let kind: NotificationKind = kind
            .parse()
            .map_err(|e: String| MarketError::Internal(e))?;

        Ok(Notification {
            id: row.try_get("id").map_err(read)?,
            user_id: row.try_get("user_id").map_err(read)?,
            title: row.try_get("title").map_err(read)?,
            message: row.try_get("message").map_err(read)?,
            kind,
            related_id: row.try_get("related_id").map_err(read)?,
            is_read: row.try_get("is_read").map_err(read)?,
            created_at: row.try_get("created_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, user_id, title, message, kind, related_id,
                is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.related_id)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to create notification: {e}"
            ))
        })?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, message, kind, related_id,
                   is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to list notifications: {e}"
            ))
        })?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to count unread notifications: {e}"
            ))
        })
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to mark notification read: {e}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to mark notifications read: {e}"
            ))
        })?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            MarketError::Internal(format!(
                "Failed to delete notification: {e}"
            ))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
