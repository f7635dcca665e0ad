pub mod auth;
pub mod funds;
pub mod health;
pub mod notifications;
pub mod support;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                       login (public)
/// /auth/me                          current user
/// /auth/password                    change own password (PUT)
/// /auth/pin                         create PIN, PIN status (managers)
/// /auth/pin/verify                  verify PIN (managers)
/// /auth/pin/{user_id}               reset PIN (superadmin, DELETE)
///
/// /users                            list, create (admin officer / superadmin)
/// /users/managers                   assignable manager directory
/// /users/{id}                       get, update, deactivate
///
/// /funds                            submit, list all
/// /funds/mine                       requester's own requisitions
/// /funds/assigned                   manager's decision queue
/// /funds/overdue-sweep              manual sweep trigger (POST)
/// /funds/{id}                       detail with discussions
/// /funds/{id}/assign                assign to manager (POST)
/// /funds/{id}/approve               approve, PIN-gated (POST)
/// /funds/{id}/reject                reject, PIN-gated (POST)
/// /funds/{id}/query                 send back with a question (POST)
/// /funds/{id}/close                 close without decision (POST)
/// /funds/{id}/reopen                reopen to pending (POST)
/// /funds/{id}/discussions           add to thread (POST)
///
/// /notifications                    list (?since, limit)
/// /notifications/read-all           mark all read (POST)
/// /notifications/unread-count       unread count (GET)
/// /notifications/unread-dates       unread calendar dates (GET)
/// /notifications/{id}/read          mark read (POST)
///
/// /support/tickets                  open, list own
/// /support/tickets/all              list all (superadmin)
/// /support/tickets/{id}             detail with replies
/// /support/tickets/{id}/replies     add reply (POST)
/// /support/tickets/{id}/status      change status (PUT, superadmin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/funds", funds::router())
        .nest("/notifications", notifications::router())
        .nest("/support", support::router())
}
