//! Demodet API server library.
//!
//! Exposes config, state, error handling, routes, and the realtime
//! WebSocket layer so integration tests and the binary share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod relay;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
