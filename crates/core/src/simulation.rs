//! Bounded random-walk sensor simulation.
//!
//! Each channel drifts by a uniformly distributed step on its own timer and
//! is clamped to a plausible physical range. Used when no live device or
//! weather feed is configured.

use std::time::Duration;

use rand::Rng;

use crate::sensors::{SensorChannel, SensorReading, AQI_MAX, DEFAULT_AQI, DEFAULT_TEMPERATURE};

/// Parameters of one channel's random walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub start: f64,
    /// Total width of the step distribution; each tick moves by
    /// `(u - 0.5) * span` for `u` uniform in `[0, 1)`.
    pub span: f64,
    pub min: f64,
    pub max: f64,
    pub interval: Duration,
}

impl WalkParams {
    /// Defaults per channel, matching the dashboard's simulated widgets.
    pub fn for_channel(channel: SensorChannel) -> Self {
        match channel {
            SensorChannel::Temperature => Self {
                start: DEFAULT_TEMPERATURE,
                span: 2.0,
                min: -10.0,
                max: 35.0,
                interval: Duration::from_millis(2000),
            },
            SensorChannel::Sound => Self {
                start: 72.0,
                span: 10.0,
                min: 30.0,
                max: 130.0,
                interval: Duration::from_millis(1500),
            },
            SensorChannel::Aqi => Self {
                start: DEFAULT_AQI,
                span: 20.0,
                min: 0.0,
                max: AQI_MAX,
                interval: Duration::from_millis(5000),
            },
        }
    }
}

/// A single bounded random walk.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    params: WalkParams,
    value: f64,
}

impl RandomWalk {
    pub fn new(params: WalkParams) -> Self {
        Self {
            value: params.start.clamp(params.min, params.max),
            params,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn params(&self) -> &WalkParams {
        &self.params
    }

    /// Advance one step and return the new value.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let change = (rng.random::<f64>() - 0.5) * self.params.span;
        self.value = (self.value + change).clamp(self.params.min, self.params.max);
        self.value
    }
}

/// Random walks for all three channels.
#[derive(Debug, Clone)]
pub struct SimulatedSensors {
    temperature: RandomWalk,
    sound: RandomWalk,
    aqi: RandomWalk,
}

impl SimulatedSensors {
    pub fn new() -> Self {
        Self {
            temperature: RandomWalk::new(WalkParams::for_channel(SensorChannel::Temperature)),
            sound: RandomWalk::new(WalkParams::for_channel(SensorChannel::Sound)),
            aqi: RandomWalk::new(WalkParams::for_channel(SensorChannel::Aqi)),
        }
    }

    pub fn walk(&self, channel: SensorChannel) -> &RandomWalk {
        match channel {
            SensorChannel::Temperature => &self.temperature,
            SensorChannel::Sound => &self.sound,
            SensorChannel::Aqi => &self.aqi,
        }
    }

    /// Step a single channel, leaving the others untouched.
    pub fn step<R: Rng + ?Sized>(&mut self, channel: SensorChannel, rng: &mut R) -> f64 {
        match channel {
            SensorChannel::Temperature => self.temperature.step(rng),
            SensorChannel::Sound => self.sound.step(rng),
            SensorChannel::Aqi => self.aqi.step(rng),
        }
    }

    pub fn reading(&self) -> SensorReading {
        SensorReading::new(self.temperature.value(), self.sound.value(), self.aqi.value())
    }
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}
