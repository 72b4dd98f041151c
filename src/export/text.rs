//! Plain-text renderings of a forecast card

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use super::format::format_date_range;
use crate::models::Forecast;
use crate::{Result, TravelCardError};

const SIGN_OFF: &str = "via travelweather.app";

/// The shareable summary.
///
/// ```text
/// Vienna, Austria — Oct 18 – Oct 24
///
/// Best day: Tuesday
///
/// Sun 14/6 20% • Mon 17/8 0% • ...
///
/// via travelweather.app
/// ```
#[must_use]
pub fn summary_text(forecast: &Forecast) -> String {
    let days = forecast
        .daily()
        .iter()
        .map(|d| {
            format!(
                "{} {}/{} {}%",
                d.day_label, d.temp_high, d.temp_low, d.precip_probability
            )
        })
        .collect::<Vec<_>>()
        .join(" • ");

    format!(
        "{} — {}\n\nBest day: {}\n\n{days}\n\n{SIGN_OFF}",
        forecast.location.display_name(),
        format_date_range(forecast.start_date(), forecast.end_date()),
        forecast.best_day().full_day_name(),
    )
}

/// Write the summary to a file
pub fn write_summary(forecast: &Forecast, path: &Path) -> Result<()> {
    std::fs::write(path, summary_text(forecast))
        .map_err(|e| TravelCardError::text_export(format!("{}: {e}", path.display())))?;
    info!("Wrote summary to {}", path.display());
    Ok(())
}

/// The card laid out for a terminal
#[must_use]
pub fn terminal_card(forecast: &Forecast) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📍 {}", forecast.location.display_name());
    let _ = writeln!(
        out,
        "   {}",
        format_date_range(forecast.start_date(), forecast.end_date())
    );
    out.push('\n');

    for (index, day) in forecast.daily().iter().enumerate() {
        let marker = if index == forecast.best_day_index() { " ✨" } else { "" };
        let temps = format!("{}° / {}°", day.temp_high, day.temp_low);
        let _ = writeln!(
            out,
            "  {:<4}{}  {:<22}{:>11}  Rain: {:>3}%{marker}",
            day.day_label,
            day.condition().emoji(),
            day.description(),
            temps,
            day.precip_probability,
        );
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "✨ Best day to visit: {}",
        forecast.best_day().full_day_name()
    );
    let _ = write!(out, "Weather data by Open-Meteo");
    out
}
