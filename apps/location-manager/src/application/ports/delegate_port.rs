//! Delegate Port
//!
//! Callbacks a caller implements to hear back from the location manager.
//! Every method is optional: the defaults do nothing, so a delegate only
//! overrides the events it cares about and unhandled results are dropped.

use crate::domain::errors::{LocationError, PlacemarkError};
use crate::domain::location::Location;
use crate::domain::placemark::Placemark;

/// Receiver for location manager results.
///
/// The manager holds delegates weakly and never keeps one alive.
///
/// # Example
///
/// ```rust
/// use location_manager::{Location, LocationManagerDelegate};
///
/// struct Logger;
///
/// impl LocationManagerDelegate for Logger {
///     fn did_receive_current_location(&self, location: &Location) {
///         println!("at {}", location.coordinate);
///     }
/// }
/// ```
pub trait LocationManagerDelegate: Send + Sync {
    /// A location request produced a fix.
    fn did_receive_current_location(&self, location: &Location) {
        let _ = location;
    }

    /// A location request failed.
    fn fetching_current_location_failed(&self, error: &LocationError) {
        let _ = error;
    }

    /// A placemark request produced a placemark.
    fn did_receive_current_placemark(&self, placemark: &Placemark) {
        let _ = placemark;
    }

    /// A placemark request failed while locating or geocoding.
    fn fetching_current_placemark_failed(&self, error: &PlacemarkError) {
        let _ = error;
    }

    /// A street address was derived from a placemark for `location`.
    fn did_receive_street_address(&self, address: &str, location: &Location) {
        let _ = (address, location);
    }
}
