//! Support ticket entity models and DTOs.

use chambers_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `support_tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupportTicket {
    pub id: DbId,
    pub user_id: DbId,
    pub ticket_type: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a support ticket.
#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub user_id: DbId,
    pub ticket_type: String,
    pub subject: String,
    pub body: String,
}

/// A row from the `support_ticket_replies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketReply {
    pub id: DbId,
    pub ticket_id: DbId,
    pub author_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}
