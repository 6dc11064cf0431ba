//! Route definitions for the `/alerts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// ```text
/// GET  /  -> list_alerts (public)
/// POST /  -> create_alert (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(alerts::list_alerts).post(alerts::create_alert))
}
