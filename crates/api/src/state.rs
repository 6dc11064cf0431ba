use std::sync::Arc;

use demodet_events::EventBus;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared state handed to every handler via `State<AppState>`.
///
/// Cheap to clone: everything non-trivial sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: demodet_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Connected realtime clients.
    pub ws_manager: Arc<WsManager>,
    /// Events published by handlers and relayed to WebSocket clients.
    pub event_bus: Arc<EventBus>,
}
