//! Application state for shared services

use std::sync::Arc;

use crate::domain::ClimateRepository;
use crate::infrastructure::services::ClimateService;

/// Immutable state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub climate_service: Arc<ClimateService>,
}

impl AppState {
    pub fn new(climate_service: ClimateService) -> Self {
        Self {
            climate_service: Arc::new(climate_service),
        }
    }

    /// Build state directly over a repository
    pub fn from_repository(repository: Arc<dyn ClimateRepository>) -> Self {
        Self::new(ClimateService::new(repository))
    }
}
