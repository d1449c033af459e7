use axum::{http::Uri, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::home;
use super::middleware::{logging_middleware, metrics_middleware, security_headers_middleware};
use super::state::AppState;
use super::types::ApiError;
use super::v1::{self, API_PREFIX};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = Router::new()
        .route("/", get(home::list_routes))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest(API_PREFIX, v1::create_v1_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http());

    match metrics {
        Some(m) => router.merge(create_metrics_router(m)),
        None => router,
    }
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for '{}'", uri.path()))
}
