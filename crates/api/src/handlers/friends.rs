//! Handlers for friend requests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use demodet_core::error::CoreError;
use demodet_core::types::DbId;
use demodet_db::models::friend::FriendRequest;
use demodet_db::models::user::UserProfile;
use demodet_db::repositories::FriendRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::users::find_user;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::ServerMessage;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub to_user_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    pub from_user_id: Option<DbId>,
}

/// POST /api/v1/users/friends/request
pub async fn send_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FriendRequest>>)> {
    let to = input
        .to_user_id
        .ok_or_else(|| AppError::BadRequest("to_user_id is required".into()))?;
    if to == auth.user_id {
        return Err(AppError::BadRequest(
            "Cannot send a friend request to yourself".into(),
        ));
    }

    find_user(&state, to).await?;
    if FriendRepo::are_friends(&state.pool, auth.user_id, to).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Already friends".into(),
        )));
    }

    // A repeat request trips `uq_friend_requests_pair` -> 409.
    let request = FriendRepo::create_request(&state.pool, auth.user_id, to).await?;
    tracing::info!(from = auth.user_id, to, "Friend request sent");

    state.event_bus.publish(
        ServerMessage::FriendRequest {
            from_user_id: auth.user_id,
        }
        .into_event()
        .with_actor(auth.user_id)
        .to_users(vec![to]),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// POST /api/v1/users/friends/accept
///
/// Returns the new friend's profile.
pub async fn accept_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AcceptRequest>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let from = input
        .from_user_id
        .ok_or_else(|| AppError::BadRequest("from_user_id is required".into()))?;

    if !FriendRepo::accept(&state.pool, from, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "friend_request",
            id: from,
        }));
    }
    tracing::info!(from, to = auth.user_id, "Friend request accepted");

    state.event_bus.publish(
        ServerMessage::FriendAccepted {
            user_id: auth.user_id,
        }
        .into_event()
        .with_actor(auth.user_id)
        .to_users(vec![from]),
    );

    let friend = find_user(&state, from).await?;
    Ok(Json(DataResponse {
        data: UserProfile::from(friend),
    }))
}
