//! Stations endpoint handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{to_records, ApiError, StationRecord};

/// GET /api/v1.0/stations
pub async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationRecord>>, ApiError> {
    let stations = state.climate_service.stations().await?;

    debug!(count = stations.len(), "Listing stations");

    Ok(Json(to_records(stations)))
}
