//! Handlers for the `/users` resource: staff directory management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use chambers_core::error::CoreError;
use chambers_core::roles::{Action, Role, ROLE_MANAGER};
use chambers_core::types::DbId;
use chambers_db::models::user::{CreateUser, UpdateUser};
use chambers_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{authorize, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for new accounts.
pub(crate) const MIN_PASSWORD_LENGTH: usize = 12;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// GET /api/v1/users
///
/// Full staff directory. Admin Officer or Superadmin only.
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::ListUsers)?;
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/managers
///
/// Active managers, the valid assignment targets for requisitions.
/// Any authenticated user may read this.
pub async fn list_managers(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let managers = UserRepo::list_active_by_role(&state.pool, ROLE_MANAGER).await?;
    Ok(Json(DataResponse { data: managers }))
}

/// POST /api/v1/users
///
/// Create a staff account. Admin Officer or Superadmin only.
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::ListUsers)?;

    let role = Role::parse(&body.role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Unknown role: {}", body.role)))
    })?;
    validate_password_strength(&body.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if body.full_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Full name must not be empty".into(),
        )));
    }

    let password_hash = hash_password(&body.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            full_name: body.full_name.trim().to_string(),
            email: body.email.trim().to_lowercase(),
            password_hash,
            role_id: role.id(),
        },
    )
    .await?;

    let profile = UserRepo::find_response_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("User vanished after creation".into()))?;

    tracing::info!(user_id = user.id, role = %role, created_by = auth.user_id, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Users may read their own profile; the directory needs ListUsers.
    if auth.user_id != id {
        authorize(&auth, Action::ListUsers)?;
    }
    let user = UserRepo::find_response_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
///
/// Update a staff account. Admin Officer or Superadmin only.
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::ListUsers)?;

    if let Some(role_id) = body.role_id {
        if Role::ALL.iter().all(|r| r.id() != role_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role id: {role_id}"
            ))));
        }
    }

    let updated = UserRepo::update(&state.pool, id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let profile = UserRepo::find_response_by_id(&state.pool, updated.id)
        .await?
        .ok_or_else(|| AppError::InternalError("User vanished after update".into()))?;
    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /api/v1/users/{id}
///
/// Soft-deactivate an account. Admin Officer or Superadmin only.
pub async fn deactivate_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    authorize(&auth, Action::ListUsers)?;
    if auth.user_id == id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot deactivate your own account".into(),
        )));
    }
    let found = UserRepo::deactivate(&state.pool, id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    tracing::info!(user_id = id, deactivated_by = auth.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
