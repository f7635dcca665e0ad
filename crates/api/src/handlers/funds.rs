//! Handlers for the `/funds` resource: the fund requisition workflow.
//!
//! Transitions run as compare-and-swap updates in the repository; when the
//! guard misses, the handlers re-read the row to report the precise reason
//! (missing row vs wrong status vs wrong manager).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use chambers_core::error::CoreError;
use chambers_core::notification::{messages, EntityType, NotificationType};
use chambers_core::requisition::{
    RequisitionAction, RequisitionStatus, RequisitionType, Urgency,
};
use chambers_core::roles::{capability, Action, Role, ROLE_MANAGER};
use chambers_core::types::DbId;
use chambers_db::models::requisition::{
    CreateRequisition, Discussion, FundRequisition, FundRequisitionDetail,
};
use chambers_db::repositories::{RequisitionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::pins::check_pin;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{authorize, RequireAdminOfficer, RequireAuth, RequireManager};
use crate::notifications::{
    notify_role_group_best_effort, notify_user_best_effort, run_overdue_sweep,
};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateFundRequest {
    pub amount: Decimal,
    pub purpose: String,
    pub requisition_type: String,
    pub urgency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub manager_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub pin: String,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscussionRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct FundDetailResponse {
    pub requisition: FundRequisitionDetail,
    pub discussions: Vec<Discussion>,
}

/// Maximum page size for requisition listing.
const MAX_LIMIT: i64 = 100;
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Explain why a guarded transition matched zero rows.
///
/// Re-reads the row: a missing row is 404; anything else is an
/// invalid-state conflict reported with the status the row actually holds.
async fn transition_miss(
    pool: &PgPool,
    id: DbId,
    action: RequisitionAction,
) -> Result<AppError, AppError> {
    let row = RequisitionRepo::find_by_id(pool, id).await?;
    Ok(match row {
        None => AppError::Core(CoreError::NotFound {
            entity: "FundRequisition",
            id,
        }),
        Some(row) => invalid_state(&row, action),
    })
}

fn invalid_state(row: &FundRequisition, action: RequisitionAction) -> AppError {
    let from = RequisitionStatus::from_id(row.status_id)
        .map(|s| s.as_str())
        .unwrap_or("unknown");
    AppError::Core(CoreError::InvalidState {
        from,
        action: action.as_str(),
    })
}

/// Whether `auth` may see this requisition: the requester, the assigned
/// manager, or a role with directory-wide visibility.
fn can_view(auth: &AuthUser, requester_id: DbId, assigned_to: Option<DbId>) -> bool {
    if auth.user_id == requester_id || assigned_to == Some(auth.user_id) {
        return true;
    }
    Role::parse(&auth.role)
        .map(|role| capability(role, Action::ViewAllRequisitions))
        .unwrap_or(false)
}

async fn requester_name(pool: &PgPool, user_id: DbId) -> Result<String, AppError> {
    Ok(UserRepo::find_by_id(pool, user_id)
        .await?
        .map(|u| u.full_name)
        .unwrap_or_else(|| format!("user {user_id}")))
}

// ---------------------------------------------------------------------------
// Submission and listing
// ---------------------------------------------------------------------------

/// POST /api/v1/funds
///
/// Submit a requisition. Any authenticated user. Confirms to the
/// requester and fans a `general` alert out to the Admin Officer group;
/// delivery failures never fail the submission.
pub async fn create_fund(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateFundRequest>,
) -> AppResult<impl IntoResponse> {
    if body.amount <= Decimal::ZERO {
        return Err(AppError::Core(CoreError::Validation(
            "Amount must be greater than zero".into(),
        )));
    }
    if body.purpose.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Purpose must not be empty".into(),
        )));
    }
    let requisition_type = RequisitionType::parse(&body.requisition_type).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown requisition type: {}",
            body.requisition_type
        )))
    })?;
    let urgency = match &body.urgency {
        Some(raw) => Urgency::parse(raw).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown urgency: {raw}")))
        })?,
        None => Urgency::default(),
    };

    let requisition = RequisitionRepo::create(
        &state.pool,
        &CreateRequisition {
            requester_id: user.user_id,
            amount: body.amount,
            purpose: body.purpose.trim().to_string(),
            requisition_type: requisition_type.as_str().to_string(),
            urgency: urgency.as_str().to_string(),
        },
    )
    .await?;

    let name = requester_name(&state.pool, user.user_id).await?;
    let entity = Some((EntityType::FundRequisition, requisition.id));
    notify_user_best_effort(
        &state.pool,
        user.user_id,
        NotificationType::FundSubmitted,
        &messages::fund_submitted_receipt(requisition.amount),
        entity,
    )
    .await;
    notify_role_group_best_effort(
        &state.pool,
        Role::Admin,
        NotificationType::General,
        &messages::fund_submitted(requisition.amount, &name),
        entity,
    )
    .await;

    tracing::info!(
        requisition_id = requisition.id,
        requester_id = user.user_id,
        "Fund requisition submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: requisition })))
}

/// GET /api/v1/funds
///
/// Directory-wide listing with optional `?status=` filter. Requires a role
/// with full visibility.
pub async fn list_funds(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::ViewAllRequisitions)?;

    let status = match &params.status {
        Some(raw) => Some(
            RequisitionStatus::ALL
                .into_iter()
                .find(|s| s.as_str() == raw)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!("Unknown status: {raw}")))
                })?,
        ),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let funds = RequisitionRepo::list(&state.pool, status, limit, offset).await?;
    Ok(Json(DataResponse { data: funds }))
}

/// GET /api/v1/funds/mine
///
/// The authenticated user's own requisitions.
pub async fn list_my_funds(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let funds = RequisitionRepo::list_for_requester(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: funds }))
}

/// GET /api/v1/funds/assigned
///
/// The calling manager's decision queue.
pub async fn list_assigned_funds(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let funds = RequisitionRepo::list_assigned_to(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: funds }))
}

/// GET /api/v1/funds/{id}
///
/// Requisition detail with its discussion thread. Visible to the
/// requester, the assigned manager, and full-visibility roles.
pub async fn get_fund(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = RequisitionRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FundRequisition",
            id,
        }))?;
    if !can_view(&auth, detail.requester_id, detail.assigned_to) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a participant in this requisition".into(),
        )));
    }
    let discussions = RequisitionRepo::list_discussions(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: FundDetailResponse {
            requisition: detail,
            discussions,
        },
    }))
}

// ---------------------------------------------------------------------------
// Workflow transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/funds/{id}/assign
///
/// Admin Officer hands the requisition to a manager. The target must be
/// an active manager. Notifies both the requester and the manager.
pub async fn assign_fund(
    RequireAdminOfficer(officer): RequireAdminOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<AssignRequest>,
) -> AppResult<impl IntoResponse> {
    let target = UserRepo::find_response_by_id(&state.pool, body.manager_id).await?;
    let manager = match target {
        Some(u) if u.role == ROLE_MANAGER && u.is_active => u,
        _ => return Err(AppError::Core(CoreError::InvalidAssignee(body.manager_id))),
    };

    let assigned = match RequisitionRepo::assign(&state.pool, id, manager.id, officer.user_id)
        .await?
    {
        Some(row) => row,
        None => return Err(transition_miss(&state.pool, id, RequisitionAction::Assign).await?),
    };

    let name = requester_name(&state.pool, assigned.requester_id).await?;
    let entity = Some((EntityType::FundRequisition, assigned.id));
    notify_user_best_effort(
        &state.pool,
        assigned.requester_id,
        NotificationType::FundAssigned,
        &messages::fund_assigned_to_requester(assigned.amount, &manager.full_name),
        entity,
    )
    .await;
    notify_user_best_effort(
        &state.pool,
        manager.id,
        NotificationType::FundAssigned,
        &messages::fund_assigned_to_manager(assigned.amount, &name),
        entity,
    )
    .await;

    tracing::info!(
        requisition_id = id,
        manager_id = manager.id,
        assigned_by = officer.user_id,
        "Fund requisition assigned"
    );
    Ok(Json(DataResponse { data: assigned }))
}

/// Shared approve/reject path: identity check, PIN check, guarded
/// decision, notifications to the requester and the Admin Officer group.
async fn decide_fund(
    state: &AppState,
    manager: &AuthUser,
    id: DbId,
    approve: bool,
    body: &DecideRequest,
) -> AppResult<FundRequisition> {
    // The actor must be the assignee before the PIN is even considered;
    // a non-assignee never burns PIN lockout attempts here.
    let current = RequisitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FundRequisition",
            id,
        }))?;
    if current.status_id == RequisitionStatus::Assigned.id()
        && current.assigned_to != Some(manager.user_id)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requisition is assigned to a different manager".into(),
        )));
    }

    check_pin(&state.pool, manager.user_id, &body.pin).await?;

    let decided =
        RequisitionRepo::decide(&state.pool, id, manager.user_id, approve, body.comment.as_deref())
            .await?;
    let decided = match decided {
        Some(row) => row,
        None => {
            // The guard also pins assigned_to, so distinguish "assigned to
            // someone else" from a plain status mismatch.
            let row = RequisitionRepo::find_by_id(&state.pool, id).await?.ok_or(
                AppError::Core(CoreError::NotFound {
                    entity: "FundRequisition",
                    id,
                }),
            )?;
            let action = if approve {
                RequisitionAction::Approve
            } else {
                RequisitionAction::Reject
            };
            if row.status_id == RequisitionStatus::Assigned.id()
                && row.assigned_to != Some(manager.user_id)
            {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Requisition is assigned to a different manager".into(),
                )));
            }
            return Err(invalid_state(&row, action));
        }
    };

    let (kind, message) = if approve {
        (
            NotificationType::FundApproved,
            messages::fund_approved(decided.amount),
        )
    } else {
        (
            NotificationType::FundRejected,
            messages::fund_rejected(decided.amount),
        )
    };
    let entity = Some((EntityType::FundRequisition, decided.id));
    notify_user_best_effort(&state.pool, decided.requester_id, kind, &message, entity).await;

    let manager_name = requester_name(&state.pool, manager.user_id).await?;
    notify_role_group_best_effort(
        &state.pool,
        Role::Admin,
        kind,
        &messages::fund_decided_for_admins(decided.amount, &manager_name, approve),
        entity,
    )
    .await;

    tracing::info!(
        requisition_id = id,
        manager_id = manager.user_id,
        approved = approve,
        "Fund requisition decided"
    );
    Ok(decided)
}

/// POST /api/v1/funds/{id}/approve
///
/// Assigned manager approves, gated by their approval PIN.
pub async fn approve_fund(
    RequireManager(manager): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<DecideRequest>,
) -> AppResult<impl IntoResponse> {
    let decided = decide_fund(&state, &manager, id, true, &body).await?;
    Ok(Json(DataResponse { data: decided }))
}

/// POST /api/v1/funds/{id}/reject
///
/// Assigned manager rejects, gated by their approval PIN.
pub async fn reject_fund(
    RequireManager(manager): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<DecideRequest>,
) -> AppResult<impl IntoResponse> {
    let decided = decide_fund(&state, &manager, id, false, &body).await?;
    Ok(Json(DataResponse { data: decided }))
}

/// POST /api/v1/funds/{id}/query
///
/// Admin Officer sends a pending requisition back to the requester with a
/// question, opening the discussion thread.
pub async fn query_fund(
    RequireAdminOfficer(officer): RequireAdminOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<NoteRequest>,
) -> AppResult<impl IntoResponse> {
    if body.note.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Query note must not be empty".into(),
        )));
    }

    let queried = match RequisitionRepo::query_requisition(&state.pool, id).await? {
        Some(row) => row,
        None => return Err(transition_miss(&state.pool, id, RequisitionAction::Query).await?),
    };

    RequisitionRepo::add_discussion(&state.pool, id, Some(officer.user_id), body.note.trim())
        .await?;
    notify_user_best_effort(
        &state.pool,
        queried.requester_id,
        NotificationType::FundQueried,
        &messages::fund_queried(queried.amount),
        Some((EntityType::FundRequisition, queried.id)),
    )
    .await;

    tracing::info!(requisition_id = id, queried_by = officer.user_id, "Fund requisition queried");
    Ok(Json(DataResponse { data: queried }))
}

/// POST /api/v1/funds/{id}/discussions
///
/// Add to the discussion thread. Authors are the Admin Officer and the
/// currently assigned manager; the thread stays open until the
/// requisition is closed. The requester is notified of every entry.
pub async fn add_discussion(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<DiscussionRequest>,
) -> AppResult<impl IntoResponse> {
    if body.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Discussion body must not be empty".into(),
        )));
    }

    let requisition = RequisitionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FundRequisition",
            id,
        }))?;

    let role = Role::parse(&user.role);
    let may_discuss = role
        .map(|r| capability(r, Action::DiscussRequisition))
        .unwrap_or(false);
    // Managers may only comment on their own assignment.
    let assigned_elsewhere =
        role == Some(Role::Manager) && requisition.assigned_to != Some(user.user_id);
    if !may_discuss || assigned_elsewhere {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the Admin Officer or the assigned manager may comment".into(),
        )));
    }
    if requisition.status_id == RequisitionStatus::Closed.id() {
        return Err(AppError::Core(CoreError::Conflict(
            "Discussion is closed on a closed requisition".into(),
        )));
    }

    let entry =
        RequisitionRepo::add_discussion(&state.pool, id, Some(user.user_id), body.body.trim())
            .await?;

    let author = requester_name(&state.pool, user.user_id).await?;
    notify_user_best_effort(
        &state.pool,
        requisition.requester_id,
        NotificationType::FundDiscussion,
        &messages::fund_discussion(&author),
        Some((EntityType::FundRequisition, id)),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// POST /api/v1/funds/{id}/close
///
/// Admin Officer closes a requisition without a decision, recording why.
pub async fn close_fund(
    RequireAdminOfficer(officer): RequireAdminOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CloseRequest>,
) -> AppResult<impl IntoResponse> {
    if body.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Closure reason must not be empty".into(),
        )));
    }

    let closed = match RequisitionRepo::close(&state.pool, id, body.reason.trim()).await? {
        Some(row) => row,
        None => return Err(transition_miss(&state.pool, id, RequisitionAction::Close).await?),
    };

    notify_user_best_effort(
        &state.pool,
        closed.requester_id,
        NotificationType::FundClosed,
        &messages::fund_closed(closed.amount, body.reason.trim()),
        Some((EntityType::FundRequisition, closed.id)),
    )
    .await;

    tracing::info!(requisition_id = id, closed_by = officer.user_id, "Fund requisition closed");
    Ok(Json(DataResponse { data: closed }))
}

/// POST /api/v1/funds/{id}/reopen
///
/// Admin Officer returns a queried or closed requisition to `pending`,
/// leaving a system note in the thread for the audit trail.
pub async fn reopen_fund(
    RequireAdminOfficer(officer): RequireAdminOfficer,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reopened = match RequisitionRepo::reopen(&state.pool, id).await? {
        Some(row) => row,
        None => return Err(transition_miss(&state.pool, id, RequisitionAction::Reopen).await?),
    };

    let officer_name = requester_name(&state.pool, officer.user_id).await?;
    RequisitionRepo::add_discussion(
        &state.pool,
        id,
        None,
        &format!("Requisition reopened by {officer_name}"),
    )
    .await?;
    notify_user_best_effort(
        &state.pool,
        reopened.requester_id,
        NotificationType::FundReopened,
        &messages::fund_reopened(reopened.amount),
        Some((EntityType::FundRequisition, reopened.id)),
    )
    .await;

    tracing::info!(requisition_id = id, reopened_by = officer.user_id, "Fund requisition reopened");
    Ok(Json(DataResponse { data: reopened }))
}

/// POST /api/v1/funds/overdue-sweep
///
/// Manually trigger the overdue sweep. Admin Officer or Superadmin.
pub async fn trigger_overdue_sweep(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::RunOverdueSweep)?;
    let report = run_overdue_sweep(&state.pool).await?;
    Ok(Json(DataResponse { data: report }))
}
