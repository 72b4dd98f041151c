//! Card exporters: PNG image, shareable text and the terminal view

pub mod format;
pub mod glyphs;
pub mod png;
pub mod text;

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::models::Forecast;
use crate::{Result, TravelCardError};

pub use format::{city_slug, format_date_for_filename, format_date_range, png_filename};
pub use png::{CARD_HEIGHT, CARD_WIDTH, render_card, render_png};
pub use text::{summary_text, terminal_card, write_summary};

/// Where a PNG should go.
///
/// No target, an existing directory or a path ending in a separator means
/// "use the generated filename inside that directory". Anything else is
/// taken as the file path.
#[must_use]
pub fn resolve_png_path(target: Option<&Path>, default_dir: &Path, forecast: &Forecast) -> PathBuf {
    let filename = png_filename(forecast);
    match target {
        None => default_dir.join(filename),
        Some(path) if path.is_dir() || names_directory(path) => path.join(filename),
        Some(path) => path.to_path_buf(),
    }
}

fn names_directory(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

/// Render the card and write it to `path`
pub fn write_png(forecast: &Forecast, path: &Path) -> Result<()> {
    let start = Instant::now();
    let bytes = render_png(forecast)?;
    std::fs::write(path, &bytes)
        .map_err(|e| TravelCardError::image_export(format!("{}: {e}", path.display())))?;

    info!(
        "Wrote {} ({} bytes) in {:.2}ms",
        path.display(),
        bytes.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyForecast, Location};
    use chrono::{Days, NaiveDate};

    fn forecast() -> Forecast {
        let start = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let daily = (0..7u64)
            .map(|i| DailyForecast::new(start + Days::new(i), 1, 16, 7, 40))
            .collect();
        Forecast::new(
            Location::new("Cape Town", -33.9258, 18.4232, "South Africa", "Africa/Johannesburg"),
            daily,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_defaults_to_output_dir() {
        let path = resolve_png_path(None, Path::new("out"), &forecast());
        assert_eq!(path, Path::new("out").join("weather-cape-town-2026-10-16.png"));
    }

    #[test]
    fn test_resolve_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_png_path(Some(dir.path()), Path::new("."), &forecast());
        assert_eq!(path, dir.path().join("weather-cape-town-2026-10-16.png"));
    }

    #[test]
    fn test_resolve_explicit_file() {
        let path = resolve_png_path(Some(Path::new("card.png")), Path::new("."), &forecast());
        assert_eq!(path, Path::new("card.png"));
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_png_path(None, dir.path(), &forecast());
        write_png(&forecast(), &path).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (1080, 1350));
    }

    #[test]
    fn test_write_png_failure_maps_to_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("card.png");
        let err = write_png(&forecast(), &path).unwrap_err();
        assert_eq!(err.user_message(), "Could not generate image. Please try again.");
    }
}
