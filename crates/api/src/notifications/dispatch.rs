//! Notification dispatch: single-recipient delivery and bounded-concurrency
//! fan-out to a role group.
//!
//! Fan-out is best-effort per recipient: one failed insert never aborts the
//! rest of the batch. Callers get a [`FanOutReport`] naming every recipient
//! that failed, and the triggering workflow operation itself still succeeds.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use sqlx::PgPool;

use chambers_core::error::CoreError;
use chambers_core::notification::{EntityType, NotificationType};
use chambers_core::roles::Role;
use chambers_core::types::DbId;
use chambers_db::models::notification::CreateNotification;
use chambers_db::repositories::{NotificationRepo, UserRepo};

use crate::error::AppError;

/// How many notification inserts a fan-out runs concurrently.
const FANOUT_CONCURRENCY: usize = 8;

/// Outcome of a role-group fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    /// Recipients the fan-out attempted to notify.
    pub attempted: usize,
    /// Notifications actually written.
    pub delivered: usize,
    /// Per-recipient failures as `(user_id, error)` pairs.
    pub failures: Vec<(DbId, String)>,
}

impl FanOutReport {
    fn empty() -> Self {
        FanOutReport {
            attempted: 0,
            delivered: 0,
            failures: Vec::new(),
        }
    }
}

fn build(
    user_id: DbId,
    kind: NotificationType,
    message: &str,
    entity: Option<(EntityType, DbId)>,
) -> CreateNotification {
    CreateNotification {
        user_id,
        notification_type: kind.as_str().to_string(),
        message: message.to_string(),
        entity_type: entity.map(|(t, _)| t.as_str().to_string()),
        entity_id: entity.map(|(_, id)| id),
    }
}

/// Deliver a notification to a single user.
///
/// Fails with [`CoreError::UnknownRecipient`] if the user does not exist.
pub async fn notify_user(
    pool: &PgPool,
    user_id: DbId,
    kind: NotificationType,
    message: &str,
    entity: Option<(EntityType, DbId)>,
) -> Result<DbId, AppError> {
    if UserRepo::find_by_id(pool, user_id).await?.is_none() {
        return Err(AppError::Core(CoreError::UnknownRecipient(user_id)));
    }
    let id = NotificationRepo::create(pool, &build(user_id, kind, message, entity)).await?;
    tracing::debug!(user_id, notification_id = id, kind = %kind, "Notification delivered");
    Ok(id)
}

/// Deliver a notification for an operation that has already committed.
///
/// Delivery failure is logged and swallowed: the caller's state change
/// stands regardless of whether the alert was written.
pub async fn notify_user_best_effort(
    pool: &PgPool,
    user_id: DbId,
    kind: NotificationType,
    message: &str,
    entity: Option<(EntityType, DbId)>,
) {
    if let Err(error) = notify_user(pool, user_id, kind, message, entity).await {
        tracing::warn!(user_id, kind = %kind, %error, "Notification delivery failed");
    }
}

/// Fan a notification out to every active user holding `role`.
///
/// A role group with no members is a successful no-op. Individual insert
/// failures are collected in the report and logged, never propagated.
pub async fn notify_role_group(
    pool: &PgPool,
    role: Role,
    kind: NotificationType,
    message: &str,
    entity: Option<(EntityType, DbId)>,
) -> Result<FanOutReport, AppError> {
    let recipients = UserRepo::list_active_by_role(pool, role.as_str()).await?;
    if recipients.is_empty() {
        tracing::debug!(role = %role, kind = %kind, "Fan-out skipped: no recipients");
        return Ok(FanOutReport::empty());
    }

    let attempted = recipients.len();
    let results: Vec<(DbId, Result<DbId, sqlx::Error>)> = stream::iter(recipients)
        .map(|recipient| {
            let input = build(recipient.id, kind, message, entity);
            async move {
                let result = NotificationRepo::create(pool, &input).await;
                (recipient.id, result)
            }
        })
        .buffer_unordered(FANOUT_CONCURRENCY)
        .collect()
        .await;

    let mut report = FanOutReport {
        attempted,
        delivered: 0,
        failures: Vec::new(),
    };
    for (user_id, result) in results {
        match result {
            Ok(_) => report.delivered += 1,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Fan-out delivery failed");
                report.failures.push((user_id, e.to_string()));
            }
        }
    }

    tracing::info!(
        role = %role,
        kind = %kind,
        attempted = report.attempted,
        delivered = report.delivered,
        "Role-group fan-out complete"
    );
    Ok(report)
}

/// Role-group fan-out for an operation that has already committed; a
/// failed recipient lookup is logged instead of propagated.
pub async fn notify_role_group_best_effort(
    pool: &PgPool,
    role: Role,
    kind: NotificationType,
    message: &str,
    entity: Option<(EntityType, DbId)>,
) {
    if let Err(error) = notify_role_group(pool, role, kind, message, entity).await {
        tracing::warn!(role = %role, kind = %kind, %error, "Role-group fan-out failed");
    }
}
