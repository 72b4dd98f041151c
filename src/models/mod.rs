//! Data models for `TravelCard`
//!
//! This module contains the core domain models organized by concern:
//! - Location: a resolved destination
//! - Weather: WMO weather code interpretation
//! - Forecast: the 7-day daily forecast and its best day

pub mod forecast;
pub mod location;
pub mod weather;

pub use forecast::{DailyForecast, FORECAST_DAYS, Forecast};
pub use location::Location;
pub use weather::WeatherCondition;
