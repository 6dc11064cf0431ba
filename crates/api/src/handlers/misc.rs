//! Connectivity probes.

use axum::body::Bytes;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

/// GET /api/v1/ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "pong": true }))
}

/// POST /api/v1/echo
///
/// Returns the JSON body under `you_sent`; an empty body echoes `null`.
pub async fn echo(body: Bytes) -> AppResult<Json<Value>> {
    let sent = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Body is not valid JSON: {e}")))?
    };
    Ok(Json(json!({ "you_sent": sent })))
}
