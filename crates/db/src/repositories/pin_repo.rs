//! Repository for the `approval_pins` table.

use sqlx::PgPool;

use chambers_core::types::{DbId, Timestamp};

use crate::models::pin::ApprovalPin;

const COLUMNS: &str =
    "id, user_id, pin_hash, failed_attempt_count, locked_until, created_at, updated_at";

/// Provides storage for manager approval credentials.
pub struct PinRepo;

impl PinRepo {
    /// Create a credential for a user.
    ///
    /// Returns `None` when the user already has one (`uq_approval_pins_user_id`),
    /// so callers can surface an already-exists error without a read-then-write
    /// race.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        pin_hash: &str,
    ) -> Result<Option<ApprovalPin>, sqlx::Error> {
        let query = format!(
            "INSERT INTO approval_pins (user_id, pin_hash)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_approval_pins_user_id DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalPin>(&query)
            .bind(user_id)
            .bind(pin_hash)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<ApprovalPin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_pins WHERE user_id = $1");
        sqlx::query_as::<_, ApprovalPin>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user has a credential on file.
    pub async fn has_pin(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM approval_pins WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Record a failed verification attempt.
    ///
    /// Atomically increments the counter and, once it reaches `max_attempts`,
    /// locks the credential until `lock_until`. Returns the new counter
    /// value, or `None` if no credential exists.
    pub async fn record_failure(
        pool: &PgPool,
        user_id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE approval_pins SET
                failed_attempt_count = failed_attempt_count + 1,
                locked_until = CASE
                    WHEN failed_attempt_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END,
                updated_at = NOW()
             WHERE user_id = $1
             RETURNING failed_attempt_count",
        )
        .bind(user_id)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_optional(pool)
        .await
    }

    /// Clear the failure counter and any lock after a successful
    /// verification.
    pub async fn reset_failures(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE approval_pins SET
                failed_attempt_count = 0,
                locked_until = NULL,
                updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a user's credential. Returns `true` if one existed.
    pub async fn delete_for_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM approval_pins WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
