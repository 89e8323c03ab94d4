//! Geocoder Port (Driven Port)
//!
//! Interface to the platform reverse geocoder.

use crate::application::services::GeocodeSink;
use crate::domain::location::Location;

/// Port for reverse geocoding.
///
/// Implementations report the placemarks found for a location (possibly
/// none) or an error through the [`GeocodeSink`] they were handed.
#[cfg_attr(test, mockall::automock)]
pub trait GeocoderPort: Send + Sync {
    /// Start reverse geocoding `location`.
    fn reverse_geocode(&self, location: &Location, sink: GeocodeSink);

    /// Abandon any in-flight geocode. Must be safe to call when idle.
    fn cancel_geocode(&self);
}
