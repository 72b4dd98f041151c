//! `TravelCard` - shareable 7-day travel weather cards
//!
//! This library provides destination search, forecast retrieval from
//! Open-Meteo, best-day selection and card export (PNG and text), plus the
//! state machine that sequences them for an interactive front end.

pub mod best_day;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod search;
pub mod session;
pub mod weather;

// Re-export core types for public API
pub use best_day::select_best_day;
pub use config::TravelCardConfig;
pub use error::{ExportKind, TravelCardError};
pub use models::{DailyForecast, Forecast, Location, WeatherCondition};
pub use orchestrator::{CardState, ForecastOrchestrator};
pub use search::{SearchDebouncer, SearchSequence, SearchTicket};
pub use weather::{ForecastProvider, Geocoder, OpenMeteoClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelCardError>;
