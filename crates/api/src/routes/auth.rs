//! Route definitions for `/auth`: login, current user, and the approval
//! PIN vault.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{auth, pins};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /login            -> login (public)
/// GET    /me               -> me
/// PUT    /password         -> change_password
///
/// POST   /pin              -> create_pin (managers)
/// GET    /pin              -> pin_status (managers)
/// POST   /pin/verify       -> verify_pin (managers)
/// DELETE /pin/{user_id}    -> reset_pin (superadmin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
        .route("/pin", post(pins::create_pin).get(pins::pin_status))
        .route("/pin/verify", post(pins::verify_pin))
        .route("/pin/{user_id}", delete(pins::reset_pin))
}
