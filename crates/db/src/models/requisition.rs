//! Fund requisition entity models and DTOs.

use chambers_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `fund_requisitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FundRequisition {
    pub id: DbId,
    pub requester_id: DbId,
    pub amount: Decimal,
    pub purpose: String,
    pub requisition_type: String,
    pub urgency: String,
    pub status_id: i16,
    pub assigned_to: Option<DbId>,
    pub assigned_by: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub decided_at: Option<Timestamp>,
    pub manager_comment: Option<String>,
    pub closure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Requisition row joined with requester and assignee display names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FundRequisitionDetail {
    pub id: DbId,
    pub requester_id: DbId,
    pub requester_name: String,
    pub amount: Decimal,
    pub purpose: String,
    pub requisition_type: String,
    pub urgency: String,
    pub status_id: i16,
    pub assigned_to: Option<DbId>,
    pub assignee_name: Option<String>,
    pub assigned_by: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub decided_at: Option<Timestamp>,
    pub manager_comment: Option<String>,
    pub closure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a requisition.
#[derive(Debug, Deserialize)]
pub struct CreateRequisition {
    pub requester_id: DbId,
    pub amount: Decimal,
    pub purpose: String,
    pub requisition_type: String,
    pub urgency: String,
}

/// A row from the `requisition_discussions` table.
///
/// `author_id` is `None` for system-generated notes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Discussion {
    pub id: DbId,
    pub requisition_id: DbId,
    pub author_id: Option<DbId>,
    pub body: String,
    pub created_at: Timestamp,
}
