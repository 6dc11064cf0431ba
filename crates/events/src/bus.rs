//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers publish [`DomainEvent`]s after a write succeeds; the realtime
//! layer subscribes and forwards each event to the sockets named by its
//! [`Audience`]. Shared as `Arc<EventBus>`.

use std::fmt;

use chrono::Utc;
use demodet_core::types::{DbId, Timestamp};
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    #[serde(rename = "alert.created")]
    AlertCreated,
    #[serde(rename = "presence.changed")]
    PresenceChanged,
    #[serde(rename = "threat.updated")]
    ThreatUpdated,
    #[serde(rename = "friend.requested")]
    FriendRequested,
    #[serde(rename = "friend.accepted")]
    FriendAccepted,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlertCreated => "alert.created",
            Self::PresenceChanged => "presence.changed",
            Self::ThreatUpdated => "threat.updated",
            Self::FriendRequested => "friend.requested",
            Self::FriendAccepted => "friend.accepted",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Audience
// ---------------------------------------------------------------------------

/// Who should receive an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "user_ids", rename_all = "lowercase")]
pub enum Audience {
    /// Every connected client.
    Everyone,
    /// Only the listed users.
    Users(Vec<DbId>),
}

impl Audience {
    pub fn includes(&self, user_id: DbId) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Users(ids) => ids.contains(&user_id),
        }
    }
}

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// An event raised by the API.
///
/// Built with [`DomainEvent::new`] and the `with_*` builder methods.
#[derive(Debug, Clone, Serialize)]
pub struct DomainEvent {
    pub topic: Topic,
    pub audience: Audience,
    /// The user whose action produced the event, if any.
    pub actor_user_id: Option<DbId>,
    /// Topic-specific body; this is what reaches the client.
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl DomainEvent {
    /// A new event for everyone with an empty object payload.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            audience: Audience::Everyone,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Restrict delivery to the given users.
    pub fn to_users(mut self, user_ids: Vec<DbId>) -> Self {
        self.audience = Audience::Users(user_ids);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out event bus.
///
/// ```rust
/// use demodet_events::{DomainEvent, EventBus, Topic};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DomainEvent::new(Topic::AlertCreated));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Returns how many received it.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let topic = event.topic;
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::trace!(%topic, "Event published with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
