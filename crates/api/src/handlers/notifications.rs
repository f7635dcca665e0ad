//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`] and operate only
//! on the caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use chambers_core::error::CoreError;
use chambers_core::types::{DbId, Timestamp};
use chambers_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Only return notifications created at or after this instant
    /// (RFC 3339).
    pub since: Option<Timestamp>,
    /// Maximum number of results. Defaults to 50, capped at 50.
    pub limit: Option<i64>,
}

/// Hard cap on page size for notification listing.
const MAX_LIMIT: i64 = 50;

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked_read: u64,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// GET /api/v1/notifications
///
/// List the authenticated user's notifications, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(MAX_LIMIT).clamp(1, MAX_LIMIT);
    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, params.since, limit).await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single notification as read. Idempotent: 204 No Content even if
/// it was already read. 404 for an unknown id, 403 when the notification
/// belongs to someone else.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let recipient = NotificationRepo::find_recipient(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;
    if recipient != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not the recipient of this notification".into(),
        )));
    }

    NotificationRepo::mark_read(&state.pool, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the authenticated user's notifications as read.
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: MarkAllReadResponse { marked_read: count } }))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications for the authenticated user.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse { data: UnreadCountResponse { count } }))
}

/// GET /api/v1/notifications/unread-dates
///
/// Distinct UTC calendar dates carrying unread notifications, newest
/// first. Drives the client's calendar badge view.
pub async fn unread_dates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let dates = NotificationRepo::unread_dates(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: dates }))
}
