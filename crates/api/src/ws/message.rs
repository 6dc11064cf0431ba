//! Server-to-client WebSocket messages.

use axum::extract::ws::Message;
use demodet_core::types::DbId;
use demodet_events::{DomainEvent, Topic};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Every frame the server pushes, tagged by `type`.
///
/// ```json
/// {"type":"alert","alert":{...}}
/// {"type":"presence","user_id":4,"online":true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Alert { alert: serde_json::Value },
    Presence { user_id: DbId, online: bool },
    Threat { user_id: DbId, threat: serde_json::Value },
    FriendRequest { from_user_id: DbId },
    FriendAccepted { user_id: DbId },
}

impl ServerMessage {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Alert { .. } => Topic::AlertCreated,
            Self::Presence { .. } => Topic::PresenceChanged,
            Self::Threat { .. } => Topic::ThreatUpdated,
            Self::FriendRequest { .. } => Topic::FriendRequested,
            Self::FriendAccepted { .. } => Topic::FriendAccepted,
        }
    }

    /// Wrap as a bus event addressed to everyone; narrow it with
    /// [`DomainEvent::to_users`].
    pub fn into_event(self) -> DomainEvent {
        let topic = self.topic();
        let payload = match serde_json::to_value(&self) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, topic = %topic, "Failed to serialize WebSocket message");
                serde_json::Value::Null
            }
        };
        DomainEvent::new(topic).with_payload(payload)
    }
}

/// Serialize a record for embedding in a [`ServerMessage`].
pub fn to_payload<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize event payload: {e}")))
}

/// Render a bus event's payload as a text frame.
pub fn event_frame(event: &DomainEvent) -> Message {
    Message::Text(event.payload.to_string().into())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use demodet_events::Audience;

    use super::*;

    #[test]
    fn presence_uses_snake_case_fields() {
        let json = serde_json::to_value(ServerMessage::Presence {
            user_id: 4,
            online: true,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "presence", "user_id": 4, "online": true}));
    }

    #[test]
    fn alert_event_carries_client_payload() {
        let event = ServerMessage::Alert {
            alert: serde_json::json!({"threatLevel": "danger"}),
        }
        .into_event();

        assert_eq!(event.topic, Topic::AlertCreated);
        assert_eq!(event.audience, Audience::Everyone);
        assert_eq!(event.payload["type"], "alert");
        assert_eq!(event.payload["alert"]["threatLevel"], "danger");
    }

    #[test]
    fn frame_is_payload_text() {
        let event = ServerMessage::FriendAccepted { user_id: 9 }.into_event();
        match event_frame(&event) {
            Message::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(value["type"], "friend_accepted");
                assert_eq!(value["user_id"], 9);
            }
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn payload_serializes_records() {
        let payload = to_payload(&serde_json::json!({"tier": "high"})).unwrap();
        assert_eq!(payload["tier"], "high");
    }

    #[test]
    fn unserializable_payload_is_an_internal_error() {
        // JSON object keys must be strings.
        let bad: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        assert_matches!(to_payload(&bad), Err(AppError::InternalError(_)));
    }
}
