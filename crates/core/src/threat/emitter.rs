//! Alert emission contract.
//!
//! The trigger hands each raised alert to an [`AlertEmitter`]. Emitters may
//! do network I/O; their failures are reported back as [`EmitError`] and the
//! trigger logs and drops them.

use async_trait::async_trait;

use crate::sensors::SensorReading;
use crate::threat::classify::ThreatLevel;
use crate::threat::score::ThreatScore;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Alert delivery failed: {0}")]
    Delivery(String),

    #[error("Alert rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Receives one call per raised alert.
#[async_trait]
pub trait AlertEmitter: Send + Sync {
    async fn emit_alert(
        &self,
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> Result<(), EmitError>;
}

/// Writes the alert to the log. Always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmitter;

#[async_trait]
impl AlertEmitter for LogEmitter {
    async fn emit_alert(
        &self,
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> Result<(), EmitError> {
        tracing::warn!(
            level = %level,
            score = score.value(),
            temperature = reading.temperature,
            sound_level = reading.sound_level,
            aqi = reading.aqi,
            "Threat alert raised"
        );
        Ok(())
    }
}

/// Forwards every alert to each inner emitter in order.
///
/// All emitters are called even if an earlier one fails; the first error is
/// returned.
#[derive(Default)]
pub struct FanoutEmitter {
    emitters: Vec<Box<dyn AlertEmitter>>,
}

impl FanoutEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, emitter: impl AlertEmitter + 'static) -> Self {
        self.emitters.push(Box::new(emitter));
        self
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

#[async_trait]
impl AlertEmitter for FanoutEmitter {
    async fn emit_alert(
        &self,
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> Result<(), EmitError> {
        let mut first_error = None;
        for emitter in &self.emitters {
            if let Err(e) = emitter.emit_alert(level, score, reading).await {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl<T: AlertEmitter + ?Sized> AlertEmitter for std::sync::Arc<T> {
    async fn emit_alert(
        &self,
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> Result<(), EmitError> {
        (**self).emit_alert(level, score, reading).await
    }
}
