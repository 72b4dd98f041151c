//! Date and filename formatting shared by the exporters

use chrono::NaiveDate;

use crate::models::Forecast;

/// "Oct 18 – Oct 24"
#[must_use]
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} – {}", start.format("%b %-d"), end.format("%b %-d"))
}

/// "2026-10-18"
#[must_use]
pub fn format_date_for_filename(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lowercase the name and replace every whitespace run with a single `-`
#[must_use]
pub fn city_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    slug
}

/// `weather-<city-slug>-<first day>.png`
#[must_use]
pub fn png_filename(forecast: &Forecast) -> String {
    format!(
        "weather-{}-{}.png",
        city_slug(&forecast.location.name),
        format_date_for_filename(forecast.start_date())
    )
}
