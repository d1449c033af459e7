//! Temperature observations of the most active station

use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::api::types::{to_records, ApiError, TemperatureRecord};

/// GET /api/v1.0/tobs
pub async fn list_most_active_station_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemperatureRecord>>, ApiError> {
    let result = state.climate_service.most_active_station_temperatures().await?;

    Ok(Json(to_records(result.observations)))
}
