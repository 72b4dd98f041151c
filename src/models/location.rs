//! Location model for a resolved destination

use serde::{Deserialize, Serialize};

/// A geocoded destination
///
/// Two locations are the same place when their coordinates match; several
/// towns share a name, so `name` alone identifies nothing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Location {
    /// Place name (city, town, etc.)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name, empty when upstream has none
    pub country: String,
    /// First-level administrative area (state, region)
    pub admin: Option<String>,
    /// IANA timezone used for the forecast request
    pub timezone: String,
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: country.into(),
            admin: None,
            timezone: timezone.into(),
        }
    }

    /// Set the administrative area
    #[must_use]
    pub fn with_admin(mut self, admin: impl Into<String>) -> Self {
        self.admin = Some(admin.into());
        self
    }

    /// "Name, Country" as shown once a location is picked
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    /// Second line of a search suggestion: "Admin, Country" or "Country"
    #[must_use]
    pub fn subtitle(&self) -> String {
        match &self.admin {
            Some(admin) if !admin.is_empty() => format!("{admin}, {}", self.country),
            _ => self.country.clone(),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_coordinates_not_name() {
        let portland_or = Location::new("Portland", 45.5152, -122.6784, "United States", "America/Los_Angeles");
        let portland_me = Location::new("Portland", 43.6591, -70.2568, "United States", "America/New_York");
        let renamed = Location::new("City of Portland", 45.5152, -122.6784, "United States", "America/Los_Angeles");

        assert_ne!(portland_or, portland_me);
        assert_eq!(portland_or, renamed);
    }

    #[test]
    fn test_display_name_and_subtitle() {
        let paris = Location::new("Paris", 48.8534, 2.3488, "France", "Europe/Paris")
            .with_admin("Île-de-France");
        assert_eq!(paris.display_name(), "Paris, France");
        assert_eq!(paris.subtitle(), "Île-de-France, France");

        let monaco = Location::new("Monaco", 43.7333, 7.4167, "Monaco", "Europe/Monaco");
        assert_eq!(monaco.subtitle(), "Monaco");
    }

    #[test]
    fn test_display_name_without_country() {
        let atoll = Location::new("Clipperton", 10.3, -109.2, "", "auto");
        assert_eq!(atoll.display_name(), "Clipperton");
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new("Interlaken", 46.818_234, 8.227_456, "Switzerland", "Europe/Zurich");
        assert_eq!(location.format_coordinates(), "46.8182, 8.2275");
    }
}
