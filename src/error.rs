//! Error types and handling for `TravelCard`

use thiserror::Error;

/// Shown when a location search fails.
pub const GEOCODE_USER_MESSAGE: &str =
    "Couldn't find that location. Please try a different search.";

/// Shown when a forecast cannot be loaded.
pub const FORECAST_USER_MESSAGE: &str = "Unable to load weather data. Please try again.";

/// Shown when the PNG card cannot be produced.
pub const EXPORT_IMAGE_USER_MESSAGE: &str = "Could not generate image. Please try again.";

/// Shown when the text summary cannot be written out.
pub const EXPORT_TEXT_USER_MESSAGE: &str = "Could not write summary.";

/// Which export surface failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Image,
    Text,
}

/// Main error type for `TravelCard`
#[derive(Error, Debug)]
pub enum TravelCardError {
    /// Location search failed or returned an unusable response
    #[error("Geocoding error: {message}")]
    Geocode { message: String },

    /// Forecast fetch or decoding failed
    #[error("Forecast error: {message}")]
    Forecast { message: String },

    /// Image or text export failed
    #[error("Export error: {message}")]
    Export { kind: ExportKind, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TravelCardError {
    /// Create a new geocoding error
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Self::Geocode {
            message: message.into(),
        }
    }

    /// Create a new forecast error
    pub fn forecast<S: Into<String>>(message: S) -> Self {
        Self::Forecast {
            message: message.into(),
        }
    }

    /// Create a new image export error
    pub fn image_export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            kind: ExportKind::Image,
            message: message.into(),
        }
    }

    /// Create a new text export error
    pub fn text_export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            kind: ExportKind::Text,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Fixed user-facing message. The underlying cause is never included.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            TravelCardError::Geocode { .. } => GEOCODE_USER_MESSAGE,
            TravelCardError::Forecast { .. } => FORECAST_USER_MESSAGE,
            TravelCardError::Export {
                kind: ExportKind::Image,
                ..
            } => EXPORT_IMAGE_USER_MESSAGE,
            TravelCardError::Export {
                kind: ExportKind::Text,
                ..
            }
            | TravelCardError::Io { .. } => EXPORT_TEXT_USER_MESSAGE,
            TravelCardError::Config { .. } => {
                "Configuration error. Please check your config file."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let geocode_err = TravelCardError::geocode("HTTP 500");
        assert!(matches!(geocode_err, TravelCardError::Geocode { .. }));

        let forecast_err = TravelCardError::forecast("connection reset");
        assert!(matches!(forecast_err, TravelCardError::Forecast { .. }));

        let export_err = TravelCardError::image_export("encoder failed");
        assert!(matches!(
            export_err,
            TravelCardError::Export {
                kind: ExportKind::Image,
                ..
            }
        ));
    }

    #[test]
    fn test_user_messages_hide_cause() {
        let geocode_err = TravelCardError::geocode("dns lookup failed for geocoding-api");
        assert_eq!(geocode_err.user_message(), GEOCODE_USER_MESSAGE);
        assert!(!geocode_err.user_message().contains("dns"));

        let forecast_err = TravelCardError::forecast("HTTP 502 Bad Gateway");
        assert_eq!(
            forecast_err.user_message(),
            "Unable to load weather data. Please try again."
        );

        assert_ne!(GEOCODE_USER_MESSAGE, FORECAST_USER_MESSAGE);
    }

    #[test]
    fn test_export_messages_by_kind() {
        assert_eq!(
            TravelCardError::image_export("x").user_message(),
            EXPORT_IMAGE_USER_MESSAGE
        );
        assert_eq!(
            TravelCardError::text_export("x").user_message(),
            EXPORT_TEXT_USER_MESSAGE
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let card_err: TravelCardError = io_err.into();
        assert!(matches!(card_err, TravelCardError::Io { .. }));
    }
}
