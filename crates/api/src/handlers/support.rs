//! Handlers for the `/support` resource: tickets and reply threads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use chambers_core::error::CoreError;
use chambers_core::notification::{EntityType, NotificationType};
use chambers_core::roles::{Role, ROLE_SUPERADMIN};
use chambers_core::support::{TicketStatus, TicketType};
use chambers_core::types::DbId;
use chambers_db::models::support::{CreateTicket, SupportTicket, TicketReply};
use chambers_db::repositories::SupportRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireSuperadmin};
use crate::notifications::{notify_role_group_best_effort, notify_user_best_effort};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub ticket_type: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    pub ticket: SupportTicket,
    pub replies: Vec<TicketReply>,
}

fn ticket_access(auth: &AuthUser, ticket: &SupportTicket) -> Result<(), AppError> {
    if ticket.user_id == auth.user_id || auth.role == ROLE_SUPERADMIN {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Not a participant in this ticket".into(),
        )))
    }
}

/// POST /api/v1/support/tickets
///
/// Open a ticket. Any authenticated user. Superadmins are notified.
pub async fn create_ticket(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateTicketRequest>,
) -> AppResult<impl IntoResponse> {
    let ticket_type = TicketType::parse(&body.ticket_type).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown ticket type: {}",
            body.ticket_type
        )))
    })?;
    if body.subject.trim().is_empty() || body.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Subject and body must not be empty".into(),
        )));
    }

    let ticket = SupportRepo::create(
        &state.pool,
        &CreateTicket {
            user_id: user.user_id,
            ticket_type: ticket_type.as_str().to_string(),
            subject: body.subject.trim().to_string(),
            body: body.body.trim().to_string(),
        },
    )
    .await?;

    notify_role_group_best_effort(
        &state.pool,
        Role::Superadmin,
        NotificationType::SupportTicketSubmitted,
        &format!("New support ticket: {}", ticket.subject),
        Some((EntityType::SupportTicket, ticket.id)),
    )
    .await;

    tracing::info!(ticket_id = ticket.id, user_id = user.user_id, "Support ticket opened");
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/support/tickets
///
/// The caller's own tickets.
pub async fn list_my_tickets(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tickets = SupportRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/support/tickets/all
///
/// Every ticket, optionally filtered by `?status=`. Superadmin only.
pub async fn list_all_tickets(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<impl IntoResponse> {
    let status = match &params.status {
        Some(raw) => Some(
            TicketStatus::parse(raw)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!("Unknown status: {raw}")))
                })?
                .as_str(),
        ),
        None => None,
    };
    let tickets = SupportRepo::list_all(&state.pool, status).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/support/tickets/{id}
///
/// Ticket detail with its reply thread. Owner or superadmin.
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = SupportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id,
        }))?;
    ticket_access(&auth, &ticket)?;
    let replies = SupportRepo::list_replies(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: TicketDetailResponse {
            ticket,
            replies,
        },
    }))
}

/// POST /api/v1/support/tickets/{id}/replies
///
/// Append to the thread. Owner or superadmin; the counterparty is
/// notified.
pub async fn add_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReplyRequest>,
) -> AppResult<impl IntoResponse> {
    if body.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Reply body must not be empty".into(),
        )));
    }
    let ticket = SupportRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id,
        }))?;
    ticket_access(&auth, &ticket)?;

    let reply = SupportRepo::add_reply(&state.pool, id, auth.user_id, body.body.trim()).await?;

    let entity = Some((EntityType::SupportTicket, id));
    let message = format!("New reply on support ticket: {}", ticket.subject);
    if auth.user_id == ticket.user_id {
        notify_role_group_best_effort(
            &state.pool,
            Role::Superadmin,
            NotificationType::SupportTicketReply,
            &message,
            entity,
        )
        .await;
    } else {
        notify_user_best_effort(
            &state.pool,
            ticket.user_id,
            NotificationType::SupportTicketReply,
            &message,
            entity,
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: reply })))
}

/// PUT /api/v1/support/tickets/{id}/status
///
/// Change a ticket's status. Superadmin only; the owner is notified.
pub async fn update_ticket_status(
    RequireSuperadmin(_admin): RequireSuperadmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = TicketStatus::parse(&body.status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown status: {}",
            body.status
        )))
    })?;

    let ticket = SupportRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id,
        }))?;

    notify_user_best_effort(
        &state.pool,
        ticket.user_id,
        NotificationType::TicketStatusChanged,
        &format!("Your support ticket is now {}: {}", ticket.status, ticket.subject),
        Some((EntityType::SupportTicket, ticket.id)),
    )
    .await;

    Ok(Json(DataResponse { data: ticket }))
}
