use axum::routing::{get, post};
use axum::Router;

use crate::handlers::threat;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/evaluate", post(threat::evaluate))
        .route("/presentation", get(threat::presentation))
}
