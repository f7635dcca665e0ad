//! Route definitions for the `/funds` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::funds;
use crate::state::AppState;

/// Routes mounted at `/funds`.
///
/// ```text
/// POST   /                   -> create_fund (any authenticated)
/// GET    /                   -> list_funds (full-visibility roles)
/// GET    /mine               -> list_my_funds
/// GET    /assigned           -> list_assigned_funds (managers)
/// POST   /overdue-sweep      -> trigger_overdue_sweep (admin / superadmin)
/// GET    /{id}               -> get_fund (participants + full visibility)
/// POST   /{id}/assign        -> assign_fund (admin officer)
/// POST   /{id}/approve       -> approve_fund (assigned manager, PIN)
/// POST   /{id}/reject        -> reject_fund (assigned manager, PIN)
/// POST   /{id}/query         -> query_fund (admin officer)
/// POST   /{id}/close         -> close_fund (admin officer)
/// POST   /{id}/reopen        -> reopen_fund (admin officer)
/// POST   /{id}/discussions   -> add_discussion (admin officer / assigned manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(funds::create_fund).get(funds::list_funds))
        .route("/mine", get(funds::list_my_funds))
        .route("/assigned", get(funds::list_assigned_funds))
        .route("/overdue-sweep", post(funds::trigger_overdue_sweep))
        .route("/{id}", get(funds::get_fund))
        .route("/{id}/assign", post(funds::assign_fund))
        .route("/{id}/approve", post(funds::approve_fund))
        .route("/{id}/reject", post(funds::reject_fund))
        .route("/{id}/query", post(funds::query_fund))
        .route("/{id}/close", post(funds::close_fund))
        .route("/{id}/reopen", post(funds::reopen_fund))
        .route("/{id}/discussions", post(funds::add_discussion))
}
