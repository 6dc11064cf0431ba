//! Event bus to WebSocket relay.
//!
//! [`EventRelay`] subscribes to the [`EventBus`](demodet_events::EventBus)
//! and pushes each event's payload to the connections its audience names.

use std::sync::Arc;

use demodet_events::{Audience, DomainEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::message::event_frame;
use crate::ws::WsManager;

pub struct EventRelay {
    ws_manager: Arc<WsManager>,
}

impl EventRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Relay until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<DomainEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                received = receiver.recv() => received,
                () = cancel.cancelled() => {
                    tracing::info!("Event relay cancelled");
                    break;
                }
            };

            match received {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event relay lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, relay shutting down");
                    break;
                }
            }
        }
    }

    /// Send one event to its audience. Returns the number of connections
    /// reached.
    pub async fn deliver(&self, event: &DomainEvent) -> usize {
        let frame = event_frame(event);
        let reached = match &event.audience {
            Audience::Everyone => self.ws_manager.broadcast(frame).await,
            Audience::Users(ids) => self.ws_manager.send_to_users(ids, frame).await,
        };
        tracing::debug!(topic = %event.topic, reached, "Relayed event");
        reached
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;

    use super::*;
    use crate::ws::ServerMessage;

    fn text(msg: Message) -> serde_json::Value {
        match msg {
            Message::Text(t) => serde_json::from_str(t.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_everyone() {
        let manager = Arc::new(WsManager::new());
        let (mut a, _) = manager.add("a".into(), 1).await;
        let (mut b, _) = manager.add("b".into(), 2).await;
        let relay = EventRelay::new(Arc::clone(&manager));

        let event = ServerMessage::Alert {
            alert: serde_json::json!({"threatLevel": "critical"}),
        }
        .into_event();
        assert_eq!(relay.deliver(&event).await, 2);

        assert_eq!(text(a.recv().await.unwrap())["type"], "alert");
        assert_eq!(text(b.recv().await.unwrap())["alert"]["threatLevel"], "critical");
    }

    #[tokio::test]
    async fn targeted_event_skips_other_users() {
        let manager = Arc::new(WsManager::new());
        let (mut friend, _) = manager.add("f".into(), 10).await;
        let (mut stranger, _) = manager.add("s".into(), 11).await;
        let relay = EventRelay::new(Arc::clone(&manager));

        let event = ServerMessage::Presence {
            user_id: 3,
            online: true,
        }
        .into_event()
        .to_users(vec![10]);
        assert_eq!(relay.deliver(&event).await, 1);

        assert_eq!(text(friend.recv().await.unwrap())["user_id"], 3);
        assert!(stranger.try_recv().is_err());
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let manager = Arc::new(WsManager::new());
        let bus = demodet_events::EventBus::default();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(EventRelay::new(manager).run(bus.subscribe(), cancel.clone()));
        cancel.cancel();

        handle.await.unwrap();
    }
}
