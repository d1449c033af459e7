//! Precipitation endpoint handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{to_records, ApiError, PrecipitationRecord};

/// GET /api/v1.0/precipitation
pub async fn list_precipitation(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrecipitationRecord>>, ApiError> {
    let readings = state.climate_service.precipitation().await?;

    debug!(count = readings.len(), "Listing last year of precipitation");

    Ok(Json(to_records(readings)))
}
