//! Hourly background loop driving the overdue requisition sweep.
//!
//! Runs the same sweep as the manual `POST /funds/overdue-sweep` trigger on
//! a fixed interval using `tokio::time::interval`. The dedup window inside
//! the sweep keeps the two paths from double-alerting.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::notifications::overdue::run_overdue_sweep;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the overdue sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Overdue sweep job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Overdue sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_overdue_sweep(&pool).await {
                    Ok(report) => {
                        if report.found_overdue > 0 {
                            tracing::info!(
                                found_overdue = report.found_overdue,
                                notifications_sent = report.notifications_sent,
                                "Overdue sweep: alerts dispatched"
                            );
                        } else {
                            tracing::debug!("Overdue sweep: nothing overdue");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Overdue sweep failed");
                    }
                }
            }
        }
    }
}
