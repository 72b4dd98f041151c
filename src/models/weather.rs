//! WMO weather code interpretation
//!
//! Open-Meteo reports one WMO code per day. Codes are sparse (0-99), so
//! they are folded into a handful of conditions for display.

use serde::{Deserialize, Serialize};

/// Weather condition category derived from a WMO code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
}

impl WeatherCondition {
    /// Fold a WMO code into a condition. Unknown codes read as partly cloudy.
    #[must_use]
    pub fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45..=48 => Self::Fog,
            51..=55 => Self::Drizzle,
            56..=67 => Self::Rain,
            71..=77 => Self::Snow,
            80..=82 => Self::RainShowers,
            85..=86 => Self::SnowShowers,
            95..=99 => Self::Thunderstorm,
            _ => Self::PartlyCloudy,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Fog => "Foggy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::RainShowers => "Rain showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "🌤️",
            Self::Fog => "🌫️",
            Self::Drizzle | Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::RainShowers => "🌦️",
            Self::SnowShowers => "🌨️",
            Self::Thunderstorm => "⛈️",
        }
    }

    /// Badge colour used by the PNG card
    #[must_use]
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Clear => [245, 180, 40],
            Self::PartlyCloudy => [150, 170, 200],
            Self::Fog => [170, 170, 170],
            Self::Drizzle | Self::RainShowers => [90, 150, 220],
            Self::Rain => [40, 100, 200],
            Self::Snow | Self::SnowShowers => [190, 220, 245],
            Self::Thunderstorm => [110, 70, 160],
        }
    }
}

/// Full WMO description for a single code, `None` for codes outside the table
#[must_use]
pub fn wmo_code_to_description(code: u8) -> Option<&'static str> {
    let description = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };
    Some(description)
}
