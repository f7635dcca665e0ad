//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. For role checks that don't fit a single
//! extractor (e.g. "admin or superadmin"), handlers call [`authorize`]
//! with the relevant [`Action`] so the decision goes through the
//! capability matrix in `chambers_core`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use chambers_core::error::CoreError;
use chambers_core::roles::{capability, Action, Role, ROLE_ADMIN, ROLE_MANAGER, ROLE_SUPERADMIN};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Check a user against the capability matrix, rejecting with 403.
pub fn authorize(user: &AuthUser, action: Action) -> Result<(), AppError> {
    let role = Role::parse(&user.role).ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(format!("Unknown role: {}", user.role)))
    })?;
    if capability(role, action) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Insufficient role for this operation".into(),
        )))
    }
}

/// Requires the `admin` (Admin Officer) role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn officer_only(RequireAdminOfficer(user): RequireAdminOfficer) -> AppResult<Json<()>> {
///     // user is guaranteed to be the admin officer role here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdminOfficer(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdminOfficer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin Officer role required".into(),
            )));
        }
        Ok(RequireAdminOfficer(user))
    }
}

/// Requires the `manager` role. Rejects with 403 otherwise.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_MANAGER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}

/// Requires the `superadmin` role. Rejects with 403 otherwise.
pub struct RequireSuperadmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperadmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_SUPERADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Superadmin role required".into(),
            )));
        }
        Ok(RequireSuperadmin(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
