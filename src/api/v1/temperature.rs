//! Daily temperature summary handlers

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{to_records, ApiError, TemperatureSummaryRecord};

/// GET /api/v1.0/{start}
pub async fn summary_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummaryRecord>>, ApiError> {
    debug!(start = %start, "Summarizing temperatures");

    let summaries = state.climate_service.temperature_summary(&start, None).await?;

    Ok(Json(to_records(summaries)))
}

/// GET /api/v1.0/{start}/{end}
pub async fn summary_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummaryRecord>>, ApiError> {
    debug!(start = %start, end = %end, "Summarizing temperatures");

    let summaries = state
        .climate_service
        .temperature_summary(&start, Some(&end))
        .await?;

    Ok(Json(to_records(summaries)))
}
