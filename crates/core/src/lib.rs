//! Domain logic for the Demodet threat monitor.
//!
//! Everything in this crate is pure: no database, no network. Sensor
//! readings go in, scores, tiers and alert decisions come out.

pub mod aqi;
pub mod error;
pub mod presentation;
pub mod sensors;
pub mod simulation;
pub mod sound;
pub mod threat;
pub mod types;
