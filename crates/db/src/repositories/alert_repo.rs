//! Repository for the `alerts` table.

use demodet_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

const COLUMNS: &str = "id, user_id, threat_level, score, message, sensor_data, created_at";

pub struct AlertRepo;

impl AlertRepo {
    /// Persist an alert reported by `user_id` (if known).
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        input: &CreateAlert,
    ) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (user_id, threat_level, score, message, sensor_data, created_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(input.threat_level.as_str())
            .bind(input.score.map(i16::from))
            .bind(&input.message)
            .bind(&input.sensor_data)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Newest alerts first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Alert>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM alerts ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
