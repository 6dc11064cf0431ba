pub mod alerts;
pub mod auth;
pub mod health;
pub mod threat;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ping                       liveness probe (public)
/// /echo                       echo JSON body (public)
/// /ws?token=                  WebSocket (token in query)
///
/// /auth/register              create account (public)
/// /auth/login                 login (public)
///
/// /users                      list profiles (auth)
/// /users/me                   get, patch own profile (auth)
/// /users/me/threat            set current threat tier (auth)
/// /users/friends/request      send friend request (auth)
/// /users/friends/accept       accept friend request (auth)
///
/// /alerts                     list (public), create (auth)
///
/// /threat/evaluate            score + classify a reading (public)
/// /threat/presentation        display table (public)
///
/// /presence                   online friends (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::misc::ping))
        .route("/echo", post(handlers::misc::echo))
        .route("/ws", get(ws::ws_handler))
        .route("/presence", get(handlers::presence::online_friends))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/alerts", alerts::router())
        .nest("/threat", threat::router())
}
