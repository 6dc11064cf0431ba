use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use demodet_core::types::DbId;
use demodet_db::repositories::FriendRepo;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::message::ServerMessage;

#[derive(Debug, Deserialize)]
pub struct WsAuthParams {
    pub token: Option<String>,
}

/// GET /api/v1/ws?token=<jwt>
///
/// Browsers cannot set headers on a WebSocket handshake, so the access token
/// rides in the query string. It is checked before the handshake itself, so
/// an unauthenticated client gets a 401 rather than an upgrade error.
pub async fn ws_handler(
    Query(params): Query<WsAuthParams>,
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let token = params
        .token
        .ok_or_else(|| AppError::unauthorized("Missing token query parameter"))?;
    let user = AuthUser::from_token(&token, &state)?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id)))
}

/// Drive one connection from registration to cleanup.
///
/// Outbound frames flow from the manager's channel to the sink on a spawned
/// task; inbound frames are read here until the client goes away.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let (mut rx, came_online) = state.ws_manager.add(conn_id.clone(), user_id).await;
    if came_online {
        announce_presence(&state, user_id, true).await;
    }

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            // Clients only listen.
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    if let Some(removed) = state.ws_manager.remove(&conn_id).await {
        if removed.went_offline {
            announce_presence(&state, user_id, false).await;
        }
    }
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}

/// Tell the user's friends that they came online or went offline.
async fn announce_presence(state: &AppState, user_id: DbId, online: bool) {
    let friends = match FriendRepo::list_friend_ids(&state.pool, user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, user_id, "Could not load friends for presence update");
            return;
        }
    };
    if friends.is_empty() {
        return;
    }

    let event = ServerMessage::Presence { user_id, online }
        .into_event()
        .with_actor(user_id)
        .to_users(friends);
    state.event_bus.publish(event);
}
