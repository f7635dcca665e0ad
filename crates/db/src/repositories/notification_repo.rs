//! Repository for the `notifications` table.

use sqlx::PgPool;

use chambers_core::types::{DbId, Timestamp};

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, user_id, notification_type, message, entity_type, entity_id, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (user_id, notification_type, message, entity_type, entity_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.notification_type)
        .bind(&input.message)
        .bind(&input.entity_type)
        .bind(input.entity_id)
        .fetch_one(pool)
        .await
    }

    /// List notifications for a user, newest first, capped at `limit`.
    ///
    /// When `since` is set, only notifications created at or after it are
    /// returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        since: Option<Timestamp>,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if since.is_some() {
            "AND created_at >= $3"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        let mut q = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit);
        if let Some(since) = since {
            q = q.bind(since);
        }
        q.fetch_all(pool).await
    }

    /// Recipient of a notification, if the notification exists. Lets the
    /// caller tell "no such notification" apart from "someone else's".
    pub async fn find_recipient(
        pool: &PgPool,
        notification_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM notifications WHERE id = $1")
            .bind(notification_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a single notification as read. Idempotent: marking an
    /// already-read notification keeps its original `read_at`.
    pub async fn mark_read(pool: &PgPool, notification_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1",
        )
        .bind(notification_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Distinct UTC calendar dates (`YYYY-MM-DD`) that carry at least one
    /// unread notification, newest first. Drives the client's calendar
    /// badge view.
    pub async fn unread_dates(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT TO_CHAR(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') \
             FROM notifications \
             WHERE user_id = $1 AND is_read = false \
             ORDER BY 1 DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Whether a notification of `notification_type` referencing the given
    /// entity was created at or after `cutoff`. Used to deduplicate
    /// repeated overdue alerts.
    pub async fn exists_recent_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
        notification_type: &str,
        cutoff: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (\
                SELECT 1 FROM notifications \
                WHERE entity_type = $1 AND entity_id = $2 \
                  AND notification_type = $3 AND created_at >= $4\
             )",
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(notification_type)
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }
}
