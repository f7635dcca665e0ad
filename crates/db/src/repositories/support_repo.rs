//! Repository for support tickets and their reply threads.

use sqlx::PgPool;

use chambers_core::types::DbId;

use crate::models::support::{CreateTicket, SupportTicket, TicketReply};

const TICKET_COLUMNS: &str =
    "id, user_id, ticket_type, subject, body, status, created_at, updated_at";

const REPLY_COLUMNS: &str = "id, ticket_id, author_id, body, created_at";

/// Provides CRUD operations for support tickets.
pub struct SupportRepo;

impl SupportRepo {
    /// Open a new ticket, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<SupportTicket, sqlx::Error> {
        let query = format!(
            "INSERT INTO support_tickets (user_id, ticket_type, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(input.user_id)
            .bind(&input.ticket_type)
            .bind(&input.subject)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let query = format!("SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = $1");
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's own tickets, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SupportTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every ticket, newest first, optionally filtered by status.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<SupportTicket>, sqlx::Error> {
        let filter = if status.is_some() {
            "WHERE status = $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT {TICKET_COLUMNS} FROM support_tickets {filter} ORDER BY created_at DESC"
        );
        let mut q = sqlx::query_as::<_, SupportTicket>(&query);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Change a ticket's status. Returns `None` if the ticket does not
    /// exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let query = format!(
            "UPDATE support_tickets SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Append a reply to a ticket's thread.
    pub async fn add_reply(
        pool: &PgPool,
        ticket_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<TicketReply, sqlx::Error> {
        let query = format!(
            "INSERT INTO support_ticket_replies (ticket_id, author_id, body)
             VALUES ($1, $2, $3)
             RETURNING {REPLY_COLUMNS}"
        );
        sqlx::query_as::<_, TicketReply>(&query)
            .bind(ticket_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// List a ticket's replies, oldest first.
    pub async fn list_replies(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketReply>, sqlx::Error> {
        let query = format!(
            "SELECT {REPLY_COLUMNS} FROM support_ticket_replies
             WHERE ticket_id = $1
             ORDER BY created_at"
        );
        sqlx::query_as::<_, TicketReply>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }
}
