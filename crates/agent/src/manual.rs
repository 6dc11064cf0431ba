//! Operator override file.
//!
//! A small JSON document such as `{"soundLevel": 120}` pins individual
//! channels to fixed values. The file is re-read on every evaluation so it
//! can be edited while the agent runs; deleting it hands control back to
//! the live sources.

use std::io;
use std::path::Path;

use demodet_core::sensors::{SensorChannel, SensorReading};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ManualError {
    #[error("Failed to read override file: {0}")]
    Io(#[from] io::Error),

    #[error("Override file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Override for {channel} must be a finite number")]
    NonFinite { channel: &'static str },
}

/// Channels the operator has pinned. Absent fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualOverride {
    pub temperature: Option<f64>,
    pub sound_level: Option<f64>,
    pub aqi: Option<f64>,
}

impl ManualOverride {
    pub fn parse(raw: &str) -> Result<Self, ManualError> {
        let manual: Self = serde_json::from_str(raw)?;
        for channel in SensorChannel::ALL {
            if manual.get(channel).is_some_and(|v| !v.is_finite()) {
                return Err(ManualError::NonFinite {
                    channel: channel.name(),
                });
            }
        }
        Ok(manual)
    }

    /// Read the override file. A missing file is not an error.
    pub async fn load(path: &Path) -> Result<Option<Self>, ManualError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::parse(&raw).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, channel: SensorChannel) -> Option<f64> {
        match channel {
            SensorChannel::Temperature => self.temperature,
            SensorChannel::Sound => self.sound_level,
            SensorChannel::Aqi => self.aqi,
        }
    }

    pub fn apply(&self, reading: SensorReading) -> SensorReading {
        SensorChannel::ALL
            .into_iter()
            .fold(reading, |reading, channel| match self.get(channel) {
                Some(value) => reading.with_value(channel, value),
                None => reading,
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn partial_override_replaces_only_named_channels() {
        let manual = ManualOverride::parse(r#"{"soundLevel": 120}"#).unwrap();
        let reading = manual.apply(SensorReading::new(18.5, 72.0, 145.0));
        assert_eq!(reading, SensorReading::new(18.5, 120.0, 145.0));
    }

    #[test]
    fn empty_object_changes_nothing() {
        let manual = ManualOverride::parse("{}").unwrap();
        let reading = SensorReading::new(1.0, 2.0, 3.0);
        assert_eq!(manual.apply(reading), reading);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_matches!(
            ManualOverride::parse("{temperature: 30}"),
            Err(ManualError::Parse(_))
        );
    }

    #[tokio::test]
    async fn missing_file_means_no_override() {
        let path = std::env::temp_dir().join("demodet-agent-no-such-override.json");
        assert_eq!(ManualOverride::load(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "demodet-agent-override-{}.json",
            std::process::id()
        ));
        tokio::fs::write(&path, r#"{"temperature": 31.5, "aqi": 420}"#)
            .await
            .unwrap();

        let manual = ManualOverride::load(&path).await.unwrap().unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(manual.temperature, Some(31.5));
        assert_eq!(manual.sound_level, None);
        assert_eq!(manual.aqi, Some(420.0));
    }
}
