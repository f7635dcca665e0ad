//! Overdue requisition sweep.
//!
//! Finds requisitions stuck in `pending` past the age threshold and alerts
//! the Admin Officer group. A dedup window keeps repeated sweeps (manual
//! trigger plus the hourly background loop) from re-alerting on the same
//! requisition within 24 hours.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use chambers_core::notification::{messages, EntityType, NotificationType};
use chambers_core::roles::Role;
use chambers_db::repositories::{NotificationRepo, RequisitionRepo};

use crate::error::AppError;
use crate::notifications::dispatch::notify_role_group;

/// A pending requisition older than this is overdue.
pub const OVERDUE_THRESHOLD_DAYS: i64 = 3;

/// Minimum gap between overdue alerts for the same requisition.
pub const DEDUP_WINDOW_HOURS: i64 = 24;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Pending requisitions past the age threshold.
    pub found_overdue: usize,
    /// Overdue alerts written this pass (post-dedup, all recipients).
    pub notifications_sent: usize,
}

/// Run one overdue sweep pass.
pub async fn run_overdue_sweep(pool: &PgPool) -> Result<SweepReport, AppError> {
    let now = Utc::now();
    let age_cutoff = now - chrono::Duration::days(OVERDUE_THRESHOLD_DAYS);
    let dedup_cutoff = now - chrono::Duration::hours(DEDUP_WINDOW_HOURS);

    let overdue = RequisitionRepo::list_pending_before(pool, age_cutoff).await?;
    let mut report = SweepReport {
        found_overdue: overdue.len(),
        notifications_sent: 0,
    };

    for requisition in &overdue {
        let already_alerted = NotificationRepo::exists_recent_for_entity(
            pool,
            EntityType::FundRequisition.as_str(),
            requisition.id,
            NotificationType::FundOverdue.as_str(),
            dedup_cutoff,
        )
        .await?;
        if already_alerted {
            continue;
        }

        let days_pending = (now - requisition.created_at).num_days();
        let message = messages::fund_overdue(
            requisition.amount,
            &requisition.requester_name,
            days_pending,
        );
        let fan_out = notify_role_group(
            pool,
            Role::Admin,
            NotificationType::FundOverdue,
            &message,
            Some((EntityType::FundRequisition, requisition.id)),
        )
        .await?;
        report.notifications_sent += fan_out.delivered;
    }

    tracing::info!(
        found_overdue = report.found_overdue,
        notifications_sent = report.notifications_sent,
        "Overdue sweep complete"
    );
    Ok(report)
}
