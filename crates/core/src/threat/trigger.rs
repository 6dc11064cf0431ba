//! Hysteresis-based alert trigger.
//!
//! The trigger has two states. It raises when the score climbs above
//! [`RAISE_ABOVE`] and re-arms only once the score falls to
//! [`CLEAR_AT_OR_BELOW`] or lower, so a score hovering in the dead zone
//! between the two never re-alerts.
//!
//! [`AlertState`] is a plain value: callers can drive it directly with
//! [`AlertState::advance`], or let [`AlertTrigger`] own it together with an
//! emitter. Either way exactly one task should own a given state; nothing
//! here locks.

use chrono::Utc;
use serde::Serialize;

use crate::sensors::SensorReading;
use crate::threat::classify::{classify_reading, classify_score, ScoreTier, ThreatLevel};
use crate::threat::emitter::AlertEmitter;
use crate::threat::score::{score, ThreatScore};
use crate::types::Timestamp;

/// A score strictly above this raises an alert.
pub const RAISE_ABOVE: u8 = 60;
/// A score at or below this clears a raised alert.
pub const CLEAR_AT_OR_BELOW: u8 = 50;

/// Whether an alert is currently raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    #[default]
    Normal,
    Alerted,
}

/// What happened to the state on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    None,
    Raised,
    Cleared,
}

impl AlertState {
    /// Feed one score through the state machine.
    pub fn advance(self, score: ThreatScore) -> (AlertState, Transition) {
        match self {
            AlertState::Normal if score.value() > RAISE_ABOVE => {
                (AlertState::Alerted, Transition::Raised)
            }
            AlertState::Alerted if score.value() <= CLEAR_AT_OR_BELOW => {
                (AlertState::Normal, Transition::Cleared)
            }
            state => (state, Transition::None),
        }
    }
}

/// Snapshot handed to consumers when an alert is raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub level: ThreatLevel,
    pub tier: ScoreTier,
    pub score: ThreatScore,
    pub reading: SensorReading,
    pub raised_at: Timestamp,
}

/// Result of evaluating one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub score: ThreatScore,
    pub tier: ScoreTier,
    pub level: ThreatLevel,
    pub state: AlertState,
    pub transition: Transition,
    /// Present only on the tick that raised the alert.
    pub alert: Option<AlertEvent>,
}

/// Owns an [`AlertState`] and forwards raised alerts to an emitter.
pub struct AlertTrigger<E> {
    state: AlertState,
    emitter: E,
}

impl<E: AlertEmitter> AlertTrigger<E> {
    pub fn new(emitter: E) -> Self {
        Self::with_state(AlertState::Normal, emitter)
    }

    /// Resume from a previously saved state.
    pub fn with_state(state: AlertState, emitter: E) -> Self {
        Self { state, emitter }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Score and classify `reading`, advance the state, and emit on a raise.
    ///
    /// Emitter failures are logged and swallowed; the state has already
    /// advanced by then, so a failed delivery is never retried on the next
    /// tick.
    pub async fn evaluate(&mut self, reading: &SensorReading) -> Evaluation {
        let score = score(reading);
        let tier = classify_score(score);
        let level = classify_reading(reading);

        let (state, transition) = self.state.advance(score);
        self.state = state;

        let alert = match transition {
            Transition::Raised => {
                if let Err(e) = self.emitter.emit_alert(level, score, reading).await {
                    tracing::warn!(error = %e, score = score.value(), "Alert emission failed");
                }
                Some(AlertEvent {
                    level,
                    tier,
                    score,
                    reading: *reading,
                    raised_at: Utc::now(),
                })
            }
            Transition::Cleared => {
                tracing::info!(score = score.value(), "Threat alert cleared");
                None
            }
            Transition::None => None,
        };

        Evaluation {
            score,
            tier,
            level,
            state,
            transition,
            alert,
        }
    }
}
