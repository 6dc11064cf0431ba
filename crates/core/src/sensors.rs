//! Sensor reading snapshot and per-channel status.
//!
//! A [`SensorReading`] is the only input the threat logic consumes. It is
//! produced fresh on every polling tick, whether it comes from a simulated
//! random walk, a live weather feed, or a manual operator override.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Baseline temperature used before the first live reading arrives.
pub const DEFAULT_TEMPERATURE: f64 = 18.5;
/// Baseline sound level used before the first live reading arrives.
pub const DEFAULT_SOUND_LEVEL: f64 = 0.0;
/// Baseline AQI used before the first live reading arrives.
pub const DEFAULT_AQI: f64 = 145.0;

/// Upper bound of the US AQI scale.
pub const AQI_MAX: f64 = 500.0;

/// One snapshot of the three environmental channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Decibels.
    pub sound_level: f64,
    /// US Air Quality Index, 0 (good) to 500 (hazardous).
    pub aqi: f64,
}

impl SensorReading {
    pub fn new(temperature: f64, sound_level: f64, aqi: f64) -> Self {
        Self {
            temperature,
            sound_level,
            aqi,
        }
    }

    /// Reject readings that carry NaN or infinite values.
    ///
    /// The scorer and classifiers are only defined over finite input, so
    /// every reading that crosses a trust boundary goes through here first.
    pub fn validate(&self) -> Result<(), CoreError> {
        for channel in SensorChannel::ALL {
            let value = self.value(channel);
            if !value.is_finite() {
                return Err(CoreError::InvalidReading {
                    channel: channel.name(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Read a single channel by name.
    pub fn value(&self, channel: SensorChannel) -> f64 {
        match channel {
            SensorChannel::Temperature => self.temperature,
            SensorChannel::Sound => self.sound_level,
            SensorChannel::Aqi => self.aqi,
        }
    }

    /// Return a copy with one channel replaced.
    pub fn with_value(mut self, channel: SensorChannel, value: f64) -> Self {
        match channel {
            SensorChannel::Temperature => self.temperature = value,
            SensorChannel::Sound => self.sound_level = value,
            SensorChannel::Aqi => self.aqi = value,
        }
        self
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE, DEFAULT_SOUND_LEVEL, DEFAULT_AQI)
    }
}

/// The three independent sensor channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorChannel {
    Temperature,
    Sound,
    Aqi,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 3] = [Self::Temperature, Self::Sound, Self::Aqi];

    /// Field name as it appears in JSON payloads.
    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Sound => "soundLevel",
            Self::Aqi => "aqi",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Sound => "dB",
            Self::Aqi => "AQI",
        }
    }
}

/// Status badge shown next to a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Normal,
    Warning,
    Critical,
}

/// Classify a single channel value on its own scale.
///
/// Temperature is bad when low (freezing is critical, below 15°C warns);
/// sound and AQI are bad when high.
pub fn channel_status(channel: SensorChannel, value: f64) -> ChannelStatus {
    match channel {
        SensorChannel::Temperature => {
            if value < 0.0 {
                ChannelStatus::Critical
            } else if value < 15.0 {
                ChannelStatus::Warning
            } else {
                ChannelStatus::Normal
            }
        }
        SensorChannel::Sound => {
            if value > 110.0 {
                ChannelStatus::Critical
            } else if value > 95.0 {
                ChannelStatus::Warning
            } else {
                ChannelStatus::Normal
            }
        }
        SensorChannel::Aqi => {
            if value > 400.0 {
                ChannelStatus::Critical
            } else if value > 250.0 {
                ChannelStatus::Warning
            } else {
                ChannelStatus::Normal
            }
        }
    }
}
