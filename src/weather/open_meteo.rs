//! Open-Meteo geocoding and daily forecast client
//!
//! Both endpoints are keyless. Each call issues exactly one GET; there is no
//! retry and no caching.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{ForecastProvider, Geocoder};
use crate::best_day::select_best_day;
use crate::config::TravelCardConfig;
use crate::models::{DailyForecast, FORECAST_DAYS, Forecast, Location};
use crate::{Result, TravelCardError};

const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// HTTP client for the Open-Meteo APIs
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    max_results: u32,
    language: String,
    min_query_chars: usize,
}

impl OpenMeteoClient {
    /// Create a client from configuration
    pub fn new(config: &TravelCardConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.api.user_agent.clone());
        if let Some(seconds) = config.api.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }
        let client = builder
            .build()
            .map_err(|e| TravelCardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.api.geocoding_url.clone(),
            forecast_url: config.api.forecast_url.clone(),
            max_results: config.search.max_results,
            language: config.search.language.clone(),
            min_query_chars: config.search.min_query_chars,
        })
    }

    fn geocoding_request_url(&self, query: &str) -> String {
        format!(
            "{}?name={}&count={}&language={}&format=json",
            self.geocoding_url,
            urlencoding::encode(query),
            self.max_results,
            urlencoding::encode(&self.language)
        )
    }

    fn forecast_request_url(&self, location: &Location) -> String {
        format!(
            "{}?latitude={}&longitude={}&daily={}&timezone={}&forecast_days={}",
            self.forecast_url,
            location.latitude,
            location.longitude,
            DAILY_FIELDS,
            urlencoding::encode(&location.timezone),
            FORECAST_DAYS
        )
    }

    /// One GET; transport failures and non-2xx statuses become `Err(reason)`
    async fn get(&self, url: &str) -> std::result::Result<Response, String> {
        debug!("Open-Meteo request URL: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }
        Ok(response)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            debug!("Query too short, skipping geocoding request");
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let url = self.geocoding_request_url(query);

        let response = self.get(&url).await.map_err(|reason| {
            warn!("Geocoding '{}' failed: {}", query, reason);
            TravelCardError::geocode(reason)
        })?;

        let body: GeocodingResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse geocoding response for '{}': {}", query, e);
            TravelCardError::geocode(format!("invalid response: {e}"))
        })?;

        let locations: Vec<Location> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .take(self.max_results as usize)
            .map(Location::from)
            .collect();

        info!(
            "Found {} locations for '{}' in {:.3}s",
            locations.len(),
            query,
            start_time.elapsed().as_secs_f64()
        );
        debug!(
            "Geocoding results: {:?}",
            locations
                .iter()
                .map(|l| format!("{} ({})", l.display_name(), l.format_coordinates()))
                .collect::<Vec<_>>()
        );

        Ok(locations)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self, location), fields(location = %location.display_name()))]
    async fn fetch_forecast(&self, location: &Location) -> Result<Forecast> {
        let start_time = Instant::now();
        let url = self.forecast_request_url(location);

        let response = self.get(&url).await.map_err(|reason| {
            warn!("Forecast for {} failed: {}", location.format_coordinates(), reason);
            TravelCardError::forecast(reason)
        })?;

        let body: ForecastResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse forecast response: {}", e);
            TravelCardError::forecast(format!("invalid response: {e}"))
        })?;

        let daily = daily_rows(body.daily)?;
        let best_day_index = select_best_day(&daily);
        let forecast = Forecast::new(location.clone(), daily, best_day_index)?;

        info!(
            "Retrieved {}-day forecast in {:.3}s, best day {} ({})",
            forecast.daily().len(),
            start_time.elapsed().as_secs_f64(),
            forecast.best_day().day_label,
            forecast.best_day().date
        );

        Ok(forecast)
    }
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        let location = Location::new(
            result.name,
            result.latitude,
            result.longitude,
            result.country.unwrap_or_default(),
            // "auto" lets Open-Meteo pick the zone from the coordinates
            result.timezone.unwrap_or_else(|| "auto".to_string()),
        );
        match result.admin1 {
            Some(admin) if !admin.is_empty() => location.with_admin(admin),
            _ => location,
        }
    }
}

/// Forecast response from `OpenMeteo`; only the daily block is used
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyData,
}

/// Columnar daily data, one entry per day in each array
#[derive(Debug, Deserialize)]
pub(crate) struct DailyData {
    time: Vec<String>,
    weather_code: Vec<Option<u8>>,
    #[serde(rename = "temperature_2m_max")]
    temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability_max", default)]
    precipitation_probability: Option<Vec<Option<f64>>>,
}

/// Turn the columnar arrays into one row per day.
///
/// Rounding uses `f64::round` (half away from zero). A `null` precipitation
/// probability, or a response without that column, counts as 0; that is an
/// assumption about the upstream data, not a documented contract. A column
/// that is present but short is still a length mismatch.
pub(crate) fn daily_rows(daily: DailyData) -> Result<Vec<DailyForecast>> {
    let days = daily.time.len();
    if daily.weather_code.len() != days
        || daily.temperature_max.len() != days
        || daily.temperature_min.len() != days
        || daily
            .precipitation_probability
            .as_ref()
            .is_some_and(|values| values.len() != days)
    {
        return Err(TravelCardError::forecast(
            "daily arrays have mismatched lengths",
        ));
    }

    let mut rows = Vec::with_capacity(days);
    for (i, time) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
            .map_err(|e| TravelCardError::forecast(format!("bad date '{time}': {e}")))?;

        let weather_code = daily.weather_code[i]
            .ok_or_else(|| TravelCardError::forecast(format!("no weather code for {date}")))?;
        let temp_high = daily.temperature_max[i]
            .ok_or_else(|| TravelCardError::forecast(format!("no maximum temperature for {date}")))?;
        let temp_low = daily.temperature_min[i]
            .ok_or_else(|| TravelCardError::forecast(format!("no minimum temperature for {date}")))?;
        let precip = daily
            .precipitation_probability
            .as_ref()
            .and_then(|values| values.get(i).copied().flatten())
            .unwrap_or(0.0);

        rows.push(DailyForecast::new(
            date,
            weather_code,
            temp_high.round() as i32,
            temp_low.round() as i32,
            precip.round().clamp(0.0, 100.0) as i32,
        ));
    }

    Ok(rows)
}
