//! Placemark Types
//!
//! Human-readable address records produced by reverse geocoding, plus the
//! street-address formatting the facade hands to delegates.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// A reverse-geocoded address record.
///
/// Every component is optional; geocoders fill in whatever they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    /// Display name of the place (often the street address itself).
    pub name: Option<String>,
    /// Street name.
    pub thoroughfare: Option<String>,
    /// House number.
    pub sub_thoroughfare: Option<String>,
    /// City.
    pub locality: Option<String>,
    /// Neighbourhood or district.
    pub sub_locality: Option<String>,
    /// State or province.
    pub administrative_area: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub iso_country_code: Option<String>,
    /// Landmarks associated with the place.
    #[serde(default)]
    pub areas_of_interest: Vec<String>,
    /// Location the placemark is anchored to.
    pub location: Option<Location>,
}

impl Placemark {
    /// Create an empty placemark.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set house number and street.
    #[must_use]
    pub fn with_street(
        mut self,
        sub_thoroughfare: impl Into<String>,
        thoroughfare: impl Into<String>,
    ) -> Self {
        self.sub_thoroughfare = Some(sub_thoroughfare.into());
        self.thoroughfare = Some(thoroughfare.into());
        self
    }

    /// Set city, state and postal code.
    #[must_use]
    pub fn with_locality(
        mut self,
        locality: impl Into<String>,
        administrative_area: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.locality = Some(locality.into());
        self.administrative_area = Some(administrative_area.into());
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Set country name and ISO code.
    #[must_use]
    pub fn with_country(
        mut self,
        country: impl Into<String>,
        iso_country_code: impl Into<String>,
    ) -> Self {
        self.country = Some(country.into());
        self.iso_country_code = Some(iso_country_code.into());
        self
    }

    /// Anchor the placemark to a location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Address lines built from the available components.
    ///
    /// Produces up to three lines: street, locality line, country.
    /// Missing or blank components are skipped, as are lines left empty.
    #[must_use]
    pub fn address_lines(&self) -> Vec<String> {
        let street = join_present(
            &[self.sub_thoroughfare.as_deref(), self.thoroughfare.as_deref()],
            " ",
        );

        let region = join_present(
            &[
                self.administrative_area.as_deref(),
                self.postal_code.as_deref(),
            ],
            " ",
        );
        let locality_line = join_present(
            &[
                self.locality.as_deref(),
                (!region.is_empty()).then_some(region.as_str()),
            ],
            ", ",
        );

        let country = join_present(&[self.country.as_deref()], "");

        [street, locality_line, country]
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Multi-line formatted address. Empty if no component is present.
    #[must_use]
    pub fn formatted_address(&self) -> String {
        self.address_lines().join("\n")
    }

    /// Street address suitable for display, if any component is present.
    #[must_use]
    pub fn street_address(&self) -> Option<String> {
        let formatted = self.formatted_address();
        (!formatted.is_empty()).then_some(formatted)
    }
}

fn join_present(parts: &[Option<&str>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|part| part.map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
