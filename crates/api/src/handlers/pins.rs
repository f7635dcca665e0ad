//! Handlers for the approval PIN vault under `/auth/pin`.
//!
//! Managers set a 4-6 digit PIN that gates approve/reject decisions. The
//! raw PIN is hashed with the same Argon2id module as passwords and never
//! stored or logged. Every verification failure renders as the same
//! generic 403 so callers cannot tell a wrong PIN from a missing or
//! locked credential.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use chambers_core::error::CoreError;
use chambers_core::pin::{validate_pin_format, LOCKOUT_MINUTES, MAX_FAILED_ATTEMPTS};
use chambers_core::roles::ROLE_MANAGER;
use chambers_core::types::DbId;
use chambers_db::repositories::{PinRepo, UserRepo};

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireManager, RequireSuperadmin};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePinRequest {
    pub email: String,
    pub pin: String,
    pub confirm_pin: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct PinVerification {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct PinStatusResponse {
    pub has_pin: bool,
}

/// Verify a manager's approval PIN, enforcing the lockout policy.
///
/// Used by the standalone verify endpoint and by the approve/reject fund
/// handlers. All failure paths return [`CoreError::InvalidPin`] or
/// [`CoreError::PinNotConfigured`], which render identically.
pub(crate) async fn check_pin(pool: &PgPool, user_id: DbId, pin: &str) -> Result<(), AppError> {
    if validate_pin_format(pin).is_err() {
        // Malformed input can never match; skip the hasher but still count
        // it against the lockout budget.
        record_pin_failure(pool, user_id).await?;
        return Err(AppError::Core(CoreError::InvalidPin));
    }

    let credential = PinRepo::find_by_user(pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::PinNotConfigured))?;

    if let Some(until) = credential.locked_until {
        if until > Utc::now() {
            tracing::warn!(user_id, "PIN verification attempted while locked");
            return Err(AppError::Core(CoreError::InvalidPin));
        }
    }

    let ok = verify_password(pin, &credential.pin_hash)
        .map_err(|e| AppError::InternalError(format!("PIN verification failed: {e}")))?;
    if !ok {
        record_pin_failure(pool, user_id).await?;
        return Err(AppError::Core(CoreError::InvalidPin));
    }

    PinRepo::reset_failures(pool, user_id).await?;
    Ok(())
}

async fn record_pin_failure(pool: &PgPool, user_id: DbId) -> Result<(), AppError> {
    let lock_until = Utc::now() + Duration::minutes(LOCKOUT_MINUTES);
    if let Some(count) =
        PinRepo::record_failure(pool, user_id, MAX_FAILED_ATTEMPTS, lock_until).await?
    {
        if count >= MAX_FAILED_ATTEMPTS {
            tracing::warn!(user_id, count, "Approval PIN locked after repeated failures");
        }
    }
    Ok(())
}

/// POST /api/v1/auth/pin
///
/// Create the calling manager's approval PIN. 409 if one already exists.
/// The submitted email must match the caller's account; a stale form
/// cannot register a PIN against someone else's session.
pub async fn create_pin(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(body): Json<CreatePinRequest>,
) -> AppResult<impl IntoResponse> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    if body.email.trim().to_lowercase() != account.email {
        return Err(AppError::Core(CoreError::Validation(
            "Email does not match your account".into(),
        )));
    }

    validate_pin_format(&body.pin).map_err(AppError::Core)?;
    if body.pin != body.confirm_pin {
        return Err(AppError::Core(CoreError::Validation(
            "PIN and confirmation do not match".into(),
        )));
    }

    let hash = hash_password(&body.pin)
        .map_err(|e| AppError::InternalError(format!("PIN hashing failed: {e}")))?;

    let created = PinRepo::create(&state.pool, user.user_id, &hash).await?;
    if created.is_none() {
        return Err(AppError::Core(CoreError::PinAlreadyExists));
    }

    tracing::info!(user_id = user.user_id, "Approval PIN created");
    Ok(StatusCode::CREATED)
}

/// POST /api/v1/auth/pin/verify
///
/// Check the calling manager's PIN without performing a decision.
pub async fn verify_pin(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(body): Json<VerifyPinRequest>,
) -> AppResult<impl IntoResponse> {
    check_pin(&state.pool, user.user_id, &body.pin).await?;
    Ok(Json(DataResponse { data: PinVerification { valid: true } }))
}

/// GET /api/v1/auth/pin
///
/// Whether the calling manager has a PIN configured.
pub async fn pin_status(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let has_pin = PinRepo::has_pin(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: PinStatusResponse { has_pin } }))
}

/// DELETE /api/v1/auth/pin/{user_id}
///
/// Superadmin-only reset: removes a manager's PIN so they can set a new
/// one. The target must hold the manager role.
pub async fn reset_pin(
    RequireSuperadmin(admin): RequireSuperadmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let target = UserRepo::find_response_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    if target.role != ROLE_MANAGER {
        return Err(AppError::Core(CoreError::Validation(
            "Approval PINs can only be reset for managers".into(),
        )));
    }

    let removed = PinRepo::delete_for_user(&state.pool, user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ApprovalPin",
            id: user_id,
        }));
    }

    tracing::info!(
        target_user_id = user_id,
        reset_by = admin.user_id,
        "Approval PIN reset"
    );
    Ok(StatusCode::NO_CONTENT)
}
