//! Handlers for the `/alerts` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use demodet_core::threat::score::MAX_SCORE;
use demodet_db::models::alert::{Alert, CreateAlert};
use demodet_db::repositories::AlertRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::message::to_payload;
use crate::ws::ServerMessage;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// GET /api/v1/alerts
///
/// Public; newest first.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let limit = params.resolve(DEFAULT_LIMIT, MAX_LIMIT);
    let alerts = AlertRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/alerts
///
/// Persists the alert under the caller and broadcasts it to every
/// connected client.
pub async fn create_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Alert>>)> {
    let input = parse_alert(body)?;

    let alert = AlertRepo::create(&state.pool, Some(auth.user_id), &input).await?;
    tracing::warn!(
        alert_id = alert.id,
        user_id = auth.user_id,
        level = %alert.threat_level,
        score = ?alert.score,
        "Threat alert recorded"
    );

    let payload = to_payload(&alert)?;
    state.event_bus.publish(
        ServerMessage::Alert { alert: payload }
            .into_event()
            .with_actor(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: alert })))
}

/// Decode the body by hand so a missing or unknown `threatLevel` is a 400
/// in the usual error shape.
fn parse_alert(body: serde_json::Value) -> AppResult<CreateAlert> {
    if !matches!(body.get("threatLevel"), Some(v) if !v.is_null()) {
        return Err(AppError::BadRequest("threatLevel required".into()));
    }
    let input: CreateAlert = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid alert: {e}")))?;
    if input.score.is_some_and(|s| s > MAX_SCORE) {
        return Err(AppError::validation(format!(
            "score must be between 0 and {MAX_SCORE}"
        )));
    }
    Ok(input)
}
