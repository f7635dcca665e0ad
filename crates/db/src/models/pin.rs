//! Approval PIN credential model.

use chambers_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `approval_pins` table. Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct ApprovalPin {
    pub id: DbId,
    pub user_id: DbId,
    pub pin_hash: String,
    pub failed_attempt_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
