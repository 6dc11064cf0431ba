//! Threat scoring, classification, and alert triggering.
//!
//! - [`score`] maps a reading to a bounded 0-100 [`ThreatScore`].
//! - [`classify`] maps a score or a raw reading to a discrete tier. Two
//!   scales exist and are deliberately kept apart: [`ScoreTier`] is derived
//!   from the score, [`ThreatLevel`] is thresholded off the raw channels.
//! - [`trigger`] is the hysteresis state machine that decides when an alert
//!   is raised, and [`emitter`] is where raised alerts go.
//!
//! All logic in this module is pure; the only state is the [`AlertState`]
//! value the caller threads through each tick.

pub mod classify;
pub mod emitter;
pub mod score;
pub mod trigger;

pub use classify::{classify_reading, classify_score, ScoreTier, ThreatLevel};
pub use emitter::{AlertEmitter, EmitError, FanoutEmitter, LogEmitter};
pub use score::{score, ScoreBreakdown, ThreatScore};
pub use trigger::{AlertEvent, AlertState, AlertTrigger, Evaluation, Transition};
