//! Sensor monitor daemon.
//!
//! Keeps a live [`SensorReading`](demodet_core::sensors::SensorReading)
//! from simulated, weather and manual sources, evaluates it on a fixed
//! cadence and reports raised alerts to the Demodet API.

pub mod config;
pub mod emitter;
pub mod manual;
pub mod monitor;
pub mod weather;
