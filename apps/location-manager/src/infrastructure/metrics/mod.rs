//! Metrics Module
//!
//! Counters for session and delivery activity, recorded through the
//! `metrics` facade. Nothing is exported unless the embedding application
//! installs a recorder; without one every call is a no-op.
//!
//! # Metrics
//!
//! - `location_manager_sessions_started_total{kind}`
//! - `location_manager_deliveries_total{callback}`
//! - `location_manager_stale_deliveries_total{source}`
//! - `location_manager_platform_errors_total{kind}`

use metrics::{counter, describe_counter};

use crate::domain::session::RequestKind;

// =============================================================================
// Metric Registration
// =============================================================================

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        "location_manager_sessions_started_total",
        "Total location sessions started by request kind"
    );
    describe_counter!(
        "location_manager_deliveries_total",
        "Total delegate callbacks invoked"
    );
    describe_counter!(
        "location_manager_stale_deliveries_total",
        "Total platform results discarded for a superseded or cancelled session"
    );
    describe_counter!(
        "location_manager_platform_errors_total",
        "Total errors reported by the location service or geocoder"
    );
}

// =============================================================================
// Metric Labels
// =============================================================================

/// Delegate callback labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// `did_receive_current_location`.
    LocationReceived,
    /// `fetching_current_location_failed`.
    LocationFailed,
    /// `did_receive_current_placemark`.
    PlacemarkReceived,
    /// `fetching_current_placemark_failed`.
    PlacemarkFailed,
    /// `did_receive_street_address`.
    StreetAddress,
}

impl Callback {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocationReceived => "location_received",
            Self::LocationFailed => "location_failed",
            Self::PlacemarkReceived => "placemark_received",
            Self::PlacemarkFailed => "placemark_failed",
            Self::StreetAddress => "street_address",
        }
    }
}

/// Which collaborator produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Platform location service.
    LocationService,
    /// Reverse geocoder.
    Geocoder,
}

impl ResultSource {
    /// Label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocationService => "location_service",
            Self::Geocoder => "geocoder",
        }
    }
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Record a session start.
pub fn record_session_started(kind: RequestKind) {
    counter!(
        "location_manager_sessions_started_total",
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Record a delegate callback invocation.
pub fn record_delivery(callback: Callback) {
    counter!(
        "location_manager_deliveries_total",
        "callback" => callback.as_str()
    )
    .increment(1);
}

/// Record a discarded stale result.
pub fn record_stale_delivery(source: ResultSource) {
    counter!(
        "location_manager_stale_deliveries_total",
        "source" => source.as_str()
    )
    .increment(1);
}

/// Record an error reported by a platform collaborator.
pub fn record_platform_error(source: ResultSource, kind: &'static str) {
    counter!(
        "location_manager_platform_errors_total",
        "source" => source.as_str(),
        "kind" => kind
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_labels() {
        assert_eq!(Callback::LocationReceived.as_str(), "location_received");
        assert_eq!(Callback::StreetAddress.as_str(), "street_address");
    }

    #[test]
    fn source_labels() {
        assert_eq!(ResultSource::LocationService.as_str(), "location_service");
        assert_eq!(ResultSource::Geocoder.as_str(), "geocoder");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        describe_metrics();
        record_session_started(RequestKind::Placemark);
        record_delivery(Callback::PlacemarkReceived);
        record_stale_delivery(ResultSource::Geocoder);
        record_platform_error(ResultSource::LocationService, "denied");
    }
}
