//! Stateless threat evaluation.

use axum::Json;
use demodet_core::presentation::{
    level_presentation, tier_presentation, LevelPresentation, TierPresentation,
};
use demodet_core::sensors::{channel_status, ChannelStatus, SensorChannel, SensorReading};
use demodet_core::threat::{
    classify_reading, classify_score, ScoreBreakdown, ScoreTier, ThreatLevel, ThreatScore,
};
use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct ChannelReport {
    pub channel: SensorChannel,
    pub value: f64,
    pub unit: &'static str,
    pub status: ChannelStatus,
}

#[derive(Debug, Serialize)]
pub struct Presentation {
    pub level: LevelPresentation,
    pub tier: TierPresentation,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub score: ThreatScore,
    pub breakdown: ScoreBreakdown,
    pub tier: ScoreTier,
    pub level: ThreatLevel,
    pub channels: Vec<ChannelReport>,
    pub presentation: Presentation,
}

/// POST /api/v1/threat/evaluate
///
/// Scores and classifies one reading. Holds no alert state: the hysteresis
/// trigger belongs to whoever owns the sensor stream.
pub async fn evaluate(Json(reading): Json<SensorReading>) -> AppResult<Json<EvaluateResponse>> {
    reading.validate()?;
    Ok(Json(evaluate_reading(&reading)))
}

pub fn evaluate_reading(reading: &SensorReading) -> EvaluateResponse {
    let breakdown = ScoreBreakdown::of(reading);
    let tier = classify_score(breakdown.total);
    let level = classify_reading(reading);

    let channels = SensorChannel::ALL
        .into_iter()
        .map(|channel| {
            let value = reading.value(channel);
            ChannelReport {
                channel,
                value,
                unit: channel.unit(),
                status: channel_status(channel, value),
            }
        })
        .collect();

    EvaluateResponse {
        score: breakdown.total,
        breakdown,
        tier,
        level,
        channels,
        presentation: Presentation {
            level: level_presentation(level),
            tier: tier_presentation(tier),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct LevelEntry {
    pub level: ThreatLevel,
    #[serde(flatten)]
    pub presentation: LevelPresentation,
}

#[derive(Debug, Serialize)]
pub struct TierEntry {
    pub tier: ScoreTier,
    #[serde(flatten)]
    pub presentation: TierPresentation,
}

#[derive(Debug, Serialize)]
pub struct PresentationTable {
    pub levels: Vec<LevelEntry>,
    pub tiers: Vec<TierEntry>,
}

/// GET /api/v1/threat/presentation
///
/// The full display table, least to most severe.
pub async fn presentation() -> Json<PresentationTable> {
    Json(PresentationTable {
        levels: ThreatLevel::ALL
            .into_iter()
            .map(|level| LevelEntry {
                level,
                presentation: level_presentation(level),
            })
            .collect(),
        tiers: ScoreTier::ALL
            .into_iter()
            .map(|tier| TierEntry {
                tier,
                presentation: tier_presentation(tier),
            })
            .collect(),
    })
}
