//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /             -> list_users (admin officer / superadmin)
/// POST   /             -> create_user (admin officer / superadmin)
/// GET    /managers     -> list_managers (any authenticated)
/// GET    /{id}         -> get_user
/// PUT    /{id}         -> update_user
/// DELETE /{id}         -> deactivate_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/managers", get(users::list_managers))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
}
