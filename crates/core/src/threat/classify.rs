//! Threat tier classifiers.
//!
//! Two independent ordinal scales exist for different consumers and are
//! never converted into one another:
//!
//! | Scale          | Input        | Tiers                                 |
//! |----------------|--------------|---------------------------------------|
//! | [`ScoreTier`]  | threat score | minimal, moderate, high, critical     |
//! | [`ThreatLevel`]| raw reading  | safe, warning, danger, critical       |
//!
//! The raw-reading cascade is an OR of per-channel thresholds and is much
//! coarser than the weighted score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sensors::SensorReading;
use crate::threat::score::ThreatScore;

// ---------------------------------------------------------------------------
// Score-tier scale
// ---------------------------------------------------------------------------

/// Tier derived from a [`ThreatScore`]. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Minimal,
    Moderate,
    High,
    Critical,
}

impl ScoreTier {
    pub const ALL: [ScoreTier; 4] = [Self::Minimal, Self::Moderate, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Upper bounds (inclusive) for the lower three score tiers.
const MINIMAL_MAX: u8 = 25;
const MODERATE_MAX: u8 = 50;
const HIGH_MAX: u8 = 75;

/// Map a score to its tier. Boundaries belong to the lower tier.
pub fn classify_score(score: ThreatScore) -> ScoreTier {
    match score.value() {
        v if v <= MINIMAL_MAX => ScoreTier::Minimal,
        v if v <= MODERATE_MAX => ScoreTier::Moderate,
        v if v <= HIGH_MAX => ScoreTier::High,
        _ => ScoreTier::Critical,
    }
}

// ---------------------------------------------------------------------------
// Raw-reading scale
// ---------------------------------------------------------------------------

/// Tier thresholded directly off the raw channels. Drives the top-level
/// alert banner and is the level recorded on alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Safe,
    Warning,
    Danger,
    Critical,
}

impl ThreatLevel {
    pub const ALL: [ThreatLevel; 4] = [Self::Safe, Self::Warning, Self::Danger, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Critical => "critical",
        }
    }
}

/// Per-tier `(temperature, sound, aqi)` thresholds, most severe first.
/// A reading lands in the first tier where any channel exceeds its bound.
const READING_CASCADE: [(ThreatLevel, f64, f64, f64); 3] = [
    (ThreatLevel::Critical, 30.0, 80.0, 200.0),
    (ThreatLevel::Danger, 25.0, 60.0, 150.0),
    (ThreatLevel::Warning, 22.0, 40.0, 100.0),
];

/// Classify a reading by the first matching tier, critical down to safe.
pub fn classify_reading(reading: &SensorReading) -> ThreatLevel {
    READING_CASCADE
        .iter()
        .find(|(_, temperature, sound, aqi)| {
            reading.temperature > *temperature
                || reading.sound_level > *sound
                || reading.aqi > *aqi
        })
        .map(|(level, ..)| *level)
        .unwrap_or(ThreatLevel::Safe)
}

// ---------------------------------------------------------------------------
// String conversions
// ---------------------------------------------------------------------------

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown score tier '{s}'")))
    }
}

impl FromStr for ThreatLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown threat level '{s}'")))
    }
}
