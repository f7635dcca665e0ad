//! Route definitions for the `/support` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::support;
use crate::state::AppState;

/// Routes mounted at `/support`.
///
/// ```text
/// POST   /tickets               -> create_ticket
/// GET    /tickets               -> list_my_tickets
/// GET    /tickets/all           -> list_all_tickets (superadmin)
/// GET    /tickets/{id}          -> get_ticket
/// POST   /tickets/{id}/replies  -> add_reply
/// PUT    /tickets/{id}/status   -> update_ticket_status (superadmin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/tickets",
            post(support::create_ticket).get(support::list_my_tickets),
        )
        .route("/tickets/all", get(support::list_all_tickets))
        .route("/tickets/{id}", get(support::get_ticket))
        .route("/tickets/{id}/replies", post(support::add_reply))
        .route("/tickets/{id}/status", put(support::update_ticket_status))
}
