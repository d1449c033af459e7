//! Climate v1.0 API endpoints

pub mod precipitation;
pub mod stations;
pub mod temperature;
pub mod tobs;

use axum::{routing::get, Router};

use super::state::AppState;

/// Mount point of the v1.0 API
pub const API_PREFIX: &str = "/api/v1.0";

/// Create v1.0 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/precipitation", get(precipitation::list_precipitation))
        .route("/stations", get(stations::list_stations))
        .route("/tobs", get(tobs::list_most_active_station_tobs))
        .route("/{start}", get(temperature::summary_from))
        .route("/{start}/{end}", get(temperature::summary_between))
}
