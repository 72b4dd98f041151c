//! Weather data sources
//!
//! The orchestrator only sees these two traits; `open_meteo` provides the
//! HTTP implementation.

use async_trait::async_trait;

use crate::Result;
use crate::models::{Forecast, Location};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Resolves free text to candidate locations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Up to the configured number of candidates, in upstream relevance order.
    /// Too-short queries return an empty list without a request.
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>>;
}

/// Resolves a location to a 7-day forecast with its best day picked
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast>;
}
