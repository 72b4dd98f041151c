//! Daily forecast model and the 7-day forecast container

use super::weather::wmo_code_to_description;
use super::{Location, WeatherCondition};
use crate::TravelCardError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in every forecast
pub const FORECAST_DAYS: usize = 7;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const FULL_DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Three-letter weekday label for a date
#[must_use]
pub fn day_label_for(date: NaiveDate) -> &'static str {
    DAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

/// Expand a three-letter label ("Mon") to the full weekday name. Unknown
/// labels are returned unchanged.
#[must_use]
pub fn full_day_name(label: &str) -> &str {
    DAY_LABELS
        .iter()
        .position(|l| *l == label)
        .map_or(label, |i| FULL_DAY_NAMES[i])
}

/// Weather for one calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// "Sun".."Sat", always the weekday of `date`
    pub day_label: String,
    /// WMO weather code
    pub weather_code: u8,
    /// Rounded daily maximum, in degrees
    pub temp_high: i32,
    /// Rounded daily minimum, in degrees
    pub temp_low: i32,
    /// Maximum precipitation probability, 0-100
    pub precip_probability: i32,
}

impl DailyForecast {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        weather_code: u8,
        temp_high: i32,
        temp_low: i32,
        precip_probability: i32,
    ) -> Self {
        Self {
            date,
            day_label: day_label_for(date).to_string(),
            weather_code,
            temp_high,
            temp_low,
            precip_probability,
        }
    }

    /// Desirability of the day: degrees minus percent chance of rain.
    ///
    /// The units are mixed on purpose; a warmer day with a slightly higher
    /// rain chance can still win.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.temp_high - self.precip_probability
    }

    #[must_use]
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }

    /// Detailed WMO wording, or the folded condition for codes outside the table
    #[must_use]
    pub fn description(&self) -> &'static str {
        wmo_code_to_description(self.weather_code)
            .unwrap_or_else(|| self.condition().description())
    }

    #[must_use]
    pub fn full_day_name(&self) -> &str {
        full_day_name(&self.day_label)
    }
}

/// A 7-day forecast for one location with its best day marked.
///
/// The days and the best-day index are only set through [`Forecast::new`],
/// so `best_day`, `start_date` and `end_date` can index without checks.
#[derive(Debug, Serialize, Clone)]
pub struct Forecast {
    pub location: Location,
    /// Consecutive days in ascending order, starting today
    daily: Vec<DailyForecast>,
    /// Index into `daily`
    best_day_index: usize,
}

impl Forecast {
    /// Build a forecast, checking the day count, date order and best-day index.
    pub fn new(
        location: Location,
        daily: Vec<DailyForecast>,
        best_day_index: usize,
    ) -> crate::Result<Self> {
        if daily.len() != FORECAST_DAYS {
            return Err(TravelCardError::forecast(format!(
                "expected {FORECAST_DAYS} days, got {}",
                daily.len()
            )));
        }

        for pair in daily.windows(2) {
            if pair[0].date.succ_opt() != Some(pair[1].date) {
                return Err(TravelCardError::forecast(format!(
                    "dates are not consecutive: {} then {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        if best_day_index >= daily.len() {
            return Err(TravelCardError::forecast(format!(
                "best day index {best_day_index} out of range"
            )));
        }

        Ok(Self {
            location,
            daily,
            best_day_index,
        })
    }

    #[must_use]
    pub fn daily(&self) -> &[DailyForecast] {
        &self.daily
    }

    #[must_use]
    pub fn best_day_index(&self) -> usize {
        self.best_day_index
    }

    #[must_use]
    pub fn best_day(&self) -> &DailyForecast {
        &self.daily[self.best_day_index]
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.daily[0].date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.daily[self.daily.len() - 1].date
    }
}
