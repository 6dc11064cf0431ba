//! Presence of the caller's friends.

use axum::extract::State;
use axum::Json;
use demodet_core::types::DbId;
use demodet_db::repositories::FriendRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    /// Friends with at least one open WebSocket, ascending.
    pub online: Vec<DbId>,
}

/// GET /api/v1/presence
pub async fn online_friends(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PresenceResponse>>> {
    let friends = FriendRepo::list_friend_ids(&state.pool, auth.user_id).await?;
    let online_now = state.ws_manager.online_user_ids().await;

    let online = friends
        .into_iter()
        .filter(|id| online_now.contains(id))
        .collect();

    Ok(Json(DataResponse {
        data: PresenceResponse { online },
    }))
}
