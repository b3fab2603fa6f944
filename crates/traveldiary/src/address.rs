//! Reverse-geocoded address components and their display form.

use serde::{Deserialize, Serialize};

/// Separator placed between address components.
const COMPONENT_SEPARATOR: &str = ", ";

/// Structured result of a reverse geocoding lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// Street and house number.
    pub street: Option<String>,
    /// City or locality.
    pub city: Option<String>,
    /// State, province or region.
    pub region: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

impl GeocodedAddress {
    /// Format as `street, city, region, country`, skipping missing or
    /// empty components.
    #[must_use]
    pub fn format(&self) -> String {
        [&self.street, &self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(COMPONENT_SEPARATOR)
    }

    /// Check whether no component carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(
        street: Option<&str>,
        city: Option<&str>,
        region: Option<&str>,
        country: Option<&str>,
    ) -> GeocodedAddress {
        GeocodedAddress {
            street: street.map(str::to_string),
            city: city.map(str::to_string),
            region: region.map(str::to_string),
            country: country.map(str::to_string),
        }
    }

    #[test]
    fn test_format_skips_missing_region() {
        let addr = address(Some("5 Ave"), Some("Paris"), None, Some("France"));
        assert_eq!(addr.format(), "5 Ave, Paris, France");
    }

    #[test]
    fn test_format_all_components() {
        let addr = address(
            Some("1 Main St"),
            Some("Springfield"),
            Some("IL"),
            Some("USA"),
        );
        assert_eq!(addr.format(), "1 Main St, Springfield, IL, USA");
    }

    #[test]
    fn test_format_skips_empty_strings() {
        let addr = address(Some(""), Some("Oslo"), Some(""), Some("Norway"));
        assert_eq!(addr.format(), "Oslo, Norway");
    }

    #[test]
    fn test_empty_address() {
        assert!(GeocodedAddress::default().is_empty());
        assert_eq!(GeocodedAddress::default().format(), "");
        assert!(!address(None, None, None, Some("Peru")).is_empty());
    }
}
