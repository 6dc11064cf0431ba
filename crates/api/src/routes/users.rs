//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{friends, users};
use crate::state::AppState;

/// ```text
/// GET   /                  -> list_users
/// GET   /me                -> get_me
/// PATCH /me                -> update_me
/// POST  /me/threat         -> set_threat
/// POST  /friends/request   -> send_request
/// POST  /friends/accept    -> accept_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route("/me/threat", post(users::set_threat))
        .route("/friends/request", post(friends::send_request))
        .route("/friends/accept", post(friends::accept_request))
}
