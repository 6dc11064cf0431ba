//! Alert entity model and DTOs.
//!
//! Alerts keep the camelCase wire names the dashboard already consumes.

use demodet_core::threat::ThreatLevel;
use demodet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted alert row.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub threat_level: String,
    pub score: Option<i16>,
    pub message: Option<String>,
    pub sensor_data: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// Body of `POST /alerts`. `threat_level` is the only required field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlert {
    pub threat_level: ThreatLevel,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sensor_data: Option<serde_json::Value>,
    /// Defaults to the insert time when absent.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}
