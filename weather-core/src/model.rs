use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user-named coordinate pair; the unit of persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Case-insensitive name comparison used for lookups and uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// One match returned by the geocoding provider, best match first.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub admin1: Option<String>,
}

impl GeocodingCandidate {
    /// "Name, Region, Country" without coordinates, skipping parts that repeat.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        if let Some(region) = self.admin1.as_deref().filter(|r| !r.is_empty() && *r != self.name) {
            parts.push(region);
        }
        if !self.country.is_empty() && self.country != self.name {
            parts.push(self.country.as_str());
        }
        parts.join(", ")
    }
}

/// Summary for one forecast day, in the location's local time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub weather_code: i64,
    pub weather_description: String,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_sum: f64,
    pub wind_speed_max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, admin1: Option<&str>, country: &str) -> GeocodingCandidate {
        GeocodingCandidate {
            name: name.into(),
            latitude: 0.0,
            longitude: 0.0,
            country: country.into(),
            admin1: admin1.map(Into::into),
        }
    }

    #[test]
    fn location_name_match_ignores_case() {
        let loc = Location { name: "Home".into(), latitude: 1.0, longitude: 2.0 };
        assert!(loc.has_name("home"));
        assert!(loc.has_name("HOME"));
        assert!(!loc.has_name("Homes"));
    }

    #[test]
    fn display_name_includes_region_and_country() {
        let c = candidate("Springfield", Some("Illinois"), "United States");
        assert_eq!(c.display_name(), "Springfield, Illinois, United States");
    }

    #[test]
    fn display_name_skips_repeated_region() {
        let c = candidate("Tokyo", Some("Tokyo"), "Japan");
        assert_eq!(c.display_name(), "Tokyo, Japan");

        let c = candidate("Singapore", None, "Singapore");
        assert_eq!(c.display_name(), "Singapore");
    }
}
