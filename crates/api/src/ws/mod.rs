//! Realtime WebSocket layer.
//!
//! Connection bookkeeping and presence live in [`WsManager`]; the upgrade
//! handler authenticates clients and announces them to their friends.

mod handler;
mod heartbeat;
pub mod manager;
pub mod message;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use message::ServerMessage;
