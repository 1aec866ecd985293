use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sentinel_core::{FlightId, FlightRecord, FlightStatus, WireStatus};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LatestStatusQuery {
    pub flight: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordObservationRequest {
    pub flight: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub delay_minutes: Option<u32>,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordObservationResponse {
    pub applied: bool,
}

impl RecordObservationRequest {
    fn into_record(self) -> Result<FlightRecord, AppError> {
        let flight_id = FlightId::parse(&self.flight)?;
        let status: FlightStatus = self.status.parse()?;
        let record = FlightRecord::new(
            flight_id,
            &self.origin,
            &self.destination,
            status,
            self.delay_minutes,
            self.observed_at,
        )?;
        Ok(record)
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/v1/flights/latest",
        get(latest_status).put(record_observation),
    )
}

/// GET /api/v1/flights/latest?flight=AF123
pub async fn latest_status(
    State(state): State<AppState>,
    query: Result<Query<LatestStatusQuery>, QueryRejection>,
) -> Result<Json<WireStatus>, AppError> {
    let Query(query) = query?;
    // A missing parameter is reported the same way as a blank one.
    let flight = query.flight.unwrap_or_default();
    let result = state.resolver.resolve(&flight).await?;
    Ok(Json(WireStatus::from(result)))
}

/// PUT /api/v1/flights/latest
pub async fn record_observation(
    State(state): State<AppState>,
    payload: Result<Json<RecordObservationRequest>, JsonRejection>,
) -> Result<Json<RecordObservationResponse>, AppError> {
    // Body shape errors (missing fields, negative delay) share the 400 path.
    let Json(req) = payload?;
    let record = req.into_record()?;
    let outcome = state.recorder.record(&record).await?;
    Ok(Json(RecordObservationResponse {
        applied: outcome.is_applied(),
    }))
}
