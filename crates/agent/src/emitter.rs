//! Alert delivery to the Demodet API.
//!
//! [`HttpEmitter`] posts raised alerts to `POST /api/v1/alerts` and tier
//! changes to `POST /api/v1/users/me/threat`. Each request runs on its own
//! task so a slow or unreachable backend never delays the next evaluation.

use std::time::Duration;

use async_trait::async_trait;
use demodet_core::presentation::level_presentation;
use demodet_core::sensors::SensorReading;
use demodet_core::threat::{AlertEmitter, EmitError, ScoreTier, ThreatLevel, ThreatScore};
use serde_json::json;

/// HTTP request timeout for a single delivery.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Recorded as the `source` of threat updates.
const THREAT_SOURCE: &str = "monitor";

#[derive(Debug, Clone)]
pub struct HttpEmitter {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpEmitter {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, EmitError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmitError::Delivery(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Body accepted by `POST /api/v1/alerts`.
    pub fn alert_body(
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> serde_json::Value {
        json!({
            "threatLevel": level,
            "score": score.value(),
            "message": level_presentation(level).message,
            "sensorData": reading,
        })
    }

    /// Body accepted by `POST /api/v1/users/me/threat`.
    pub fn threat_body(tier: ScoreTier, score: ThreatScore) -> serde_json::Value {
        json!({
            "tier": tier,
            "score": score.value(),
            "source": THREAT_SOURCE,
        })
    }

    pub async fn post_alert(&self, body: &serde_json::Value) -> Result<(), EmitError> {
        self.post("/api/v1/alerts", body).await
    }

    pub async fn post_threat(&self, tier: ScoreTier, score: ThreatScore) -> Result<(), EmitError> {
        self.post("/api/v1/users/me/threat", &Self::threat_body(tier, score))
            .await
    }

    /// Publish a tier change in the background.
    pub fn report_tier(&self, tier: ScoreTier, score: ThreatScore) {
        let emitter = self.clone();
        tokio::spawn(async move {
            if let Err(e) = emitter.post_threat(tier, score).await {
                tracing::warn!(error = %e, tier = %tier, "Failed to report threat tier");
            }
        });
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<(), EmitError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| EmitError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AlertEmitter for HttpEmitter {
    /// Spawns the POST and returns immediately; delivery failures are
    /// logged from the spawned task.
    async fn emit_alert(
        &self,
        level: ThreatLevel,
        score: ThreatScore,
        reading: &SensorReading,
    ) -> Result<(), EmitError> {
        let body = Self::alert_body(level, score, reading);
        let emitter = self.clone();
        tokio::spawn(async move {
            match emitter.post_alert(&body).await {
                Ok(()) => tracing::info!(level = %level, score = score.value(), "Alert delivered"),
                Err(e) => tracing::warn!(error = %e, level = %level, "Alert delivery failed"),
            }
        });
        Ok(())
    }
}
