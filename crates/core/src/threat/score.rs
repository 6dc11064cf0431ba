//! Composite threat score.
//!
//! Each channel contributes a fixed number of points chosen by a step
//! function; the total is the sum, clamped to `[0, 100]`. The per-channel
//! maxima (33 + 33 + 34) already sum to 100.

use serde::{Deserialize, Serialize};

use crate::sensors::SensorReading;

/// Highest possible score.
pub const MAX_SCORE: u8 = 100;

/// Integer threat score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreatScore(u8);

impl ThreatScore {
    /// Build a score, clamping anything above [`MAX_SCORE`].
    pub fn new(value: u32) -> Self {
        Self(value.min(u32::from(MAX_SCORE)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<ThreatScore> for i16 {
    fn from(score: ThreatScore) -> Self {
        i16::from(score.0)
    }
}

impl std::fmt::Display for ThreatScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-channel contributions behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub temperature: u8,
    pub sound: u8,
    pub aqi: u8,
    pub total: ThreatScore,
}

impl ScoreBreakdown {
    pub fn of(reading: &SensorReading) -> Self {
        let temperature = temperature_points(reading.temperature);
        let sound = sound_points(reading.sound_level);
        let aqi = aqi_points(reading.aqi);
        let total = ThreatScore::new(u32::from(temperature) + u32::from(sound) + u32::from(aqi));
        Self {
            temperature,
            sound,
            aqi,
            total,
        }
    }
}

/// Score a reading.
///
/// Total over finite input. Non-finite values are a precondition violation;
/// run [`SensorReading::validate`] first.
pub fn score(reading: &SensorReading) -> ThreatScore {
    ScoreBreakdown::of(reading).total
}

/// Freezing is worst, cold is bad, heat above 35°C is bad, the rest is baseline.
pub fn temperature_points(celsius: f64) -> u8 {
    if celsius < 0.0 {
        33
    } else if celsius < 15.0 {
        20
    } else if celsius > 35.0 {
        25
    } else {
        5
    }
}

pub fn sound_points(decibels: f64) -> u8 {
    if decibels > 110.0 {
        33
    } else if decibels > 95.0 {
        20
    } else if decibels > 80.0 {
        10
    } else {
        0
    }
}

/// Any measurable particulate load contributes the 5-point baseline; an AQI
/// of zero (no pollution registered) contributes nothing.
///
/// The zero case is what keeps the reference totals exact: `(15, 0, 0)`
/// scores 5, `(-1, 0, 0)` scores 33 and `(20, 111, 0)` scores 38.
pub fn aqi_points(aqi: f64) -> u8 {
    if aqi > 400.0 {
        34
    } else if aqi > 250.0 {
        20
    } else if aqi > 150.0 {
        10
    } else if aqi > 0.0 {
        5
    } else {
        0
    }
}
