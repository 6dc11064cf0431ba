//! Handlers for the `/users` resource.

use axum::extract::{Query, State};
use axum::Json;
use demodet_core::error::CoreError;
use demodet_core::threat::score::MAX_SCORE;
use demodet_core::types::DbId;
use demodet_db::models::friend::FriendRequest;
use demodet_db::models::user::{SetThreat, UpdateProfile, User, UserProfile};
use demodet_db::repositories::{FriendRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::message::to_payload;
use crate::ws::ServerMessage;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// The caller's own profile plus their social graph.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub friends: Vec<UserProfile>,
    pub incoming_requests: Vec<FriendRequest>,
}

/// GET /api/v1/users
pub async fn list_users(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<UserProfile>>>> {
    let limit = params.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let users = UserRepo::list(&state.pool, limit).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserProfile::from).collect(),
    }))
}

/// GET /api/v1/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = find_user(&state, auth.user_id).await?;
    let friends = FriendRepo::list_friends(&state.pool, auth.user_id).await?;
    let incoming_requests = FriendRepo::list_incoming_requests(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            profile: UserProfile::from(user),
            friends: friends.into_iter().map(UserProfile::from).collect(),
            incoming_requests,
        },
    }))
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    validate_profile(&input)?;

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserProfile::from(user),
    }))
}

/// POST /api/v1/users/me/threat
///
/// Records the caller's current score tier and tells their friends.
pub async fn set_threat(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetThreat>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    if input.score.is_some_and(|s| s > MAX_SCORE) {
        return Err(AppError::validation(format!(
            "score must be between 0 and {MAX_SCORE}"
        )));
    }

    let user = UserRepo::set_current_threat(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    let profile = UserProfile::from(user);

    tracing::debug!(user_id = auth.user_id, tier = %input.tier, "Current threat updated");

    let friends = FriendRepo::list_friend_ids(&state.pool, auth.user_id).await?;
    if !friends.is_empty() {
        let threat = to_payload(&profile.current_threat)?;
        state.event_bus.publish(
            ServerMessage::Threat {
                user_id: auth.user_id,
                threat,
            }
            .into_event()
            .with_actor(auth.user_id)
            .to_users(friends),
        );
    }

    Ok(Json(DataResponse { data: profile }))
}

pub(crate) async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))
}

fn validate_profile(input: &UpdateProfile) -> AppResult<()> {
    if input.display_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("display_name must not be blank"));
    }
    if input
        .favorite_song
        .as_ref()
        .is_some_and(|s| s.title.trim().is_empty())
    {
        return Err(AppError::validation("favorite_song.title must not be blank"));
    }
    match (input.lat, input.lon) {
        (None, None) => {}
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(AppError::validation("lat/lon out of range"));
            }
        }
        _ => return Err(AppError::validation("lat and lon must be set together")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use demodet_db::models::user::FavoriteSong;

    use super::*;

    #[test]
    fn empty_patch_is_valid() {
        assert!(validate_profile(&UpdateProfile::default()).is_ok());
    }

    #[test]
    fn half_a_location_is_rejected() {
        let input = UpdateProfile {
            lat: Some(10.0),
            ..Default::default()
        };
        assert!(validate_profile(&input).is_err());
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let input = UpdateProfile {
            lat: Some(91.0),
            lon: Some(0.0),
            ..Default::default()
        };
        assert!(validate_profile(&input).is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let blank_name = UpdateProfile {
            display_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_profile(&blank_name).is_err());

        let blank_song = UpdateProfile {
            favorite_song: Some(FavoriteSong {
                title: "".into(),
                artist: None,
                url: None,
            }),
            ..Default::default()
        };
        assert!(validate_profile(&blank_song).is_err());
    }
}
