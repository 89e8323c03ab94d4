//! Failure Descriptors
//!
//! Errors reported by the platform collaborators. The facade adds no
//! taxonomy of its own; it only routes these to the matching delegate
//! callback.

/// The platform could not produce a location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The user denied location authorization.
    #[error("location access denied")]
    Denied,

    /// No fix is available right now (no signal, indoors, etc.).
    #[error("location currently unknown")]
    LocationUnknown,

    /// Location services are switched off on the device.
    #[error("location services are disabled")]
    ServicesDisabled,

    /// Any other platform failure.
    #[error("location service error: {message}")]
    Platform {
        /// Error details.
        message: String,
    },
}

impl LocationError {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Denied => "denied",
            Self::LocationUnknown => "location_unknown",
            Self::ServicesDisabled => "services_disabled",
            Self::Platform { .. } => "platform",
        }
    }
}

/// Reverse geocoding failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// The geocoder returned no placemarks for the location.
    #[error("no placemark found for location")]
    NoResult,

    /// The geocoding backend could not be reached.
    #[error("geocoder network error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// The geocode was cancelled before completing.
    #[error("geocode cancelled")]
    Cancelled,

    /// Any other geocoder failure.
    #[error("geocoder error: {message}")]
    Platform {
        /// Error details.
        message: String,
    },
}

impl GeocodeError {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoResult => "no_result",
            Self::Network { .. } => "network",
            Self::Cancelled => "cancelled",
            Self::Platform { .. } => "platform",
        }
    }
}

/// A placemark request failed, either fetching the location or geocoding it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacemarkError {
    /// The location fetch preceding the geocode failed.
    #[error("placemark fetch failed: {0}")]
    Location(#[from] LocationError),

    /// Reverse geocoding failed.
    #[error("placemark fetch failed: {0}")]
    Geocode(#[from] GeocodeError),
}

impl PlacemarkError {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Location(e) => e.kind(),
            Self::Geocode(e) => e.kind(),
        }
    }
}
