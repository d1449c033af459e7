//! Infrastructure services

mod climate_service;

pub use climate_service::ClimateService;
