//! Delivery Sinks
//!
//! Handles given to the platform collaborators when a session starts.
//! Each sink remembers the session token it was issued for and holds the
//! manager only weakly, so a late delivery after a stop, a supersede or
//! the manager being dropped is discarded.

use std::sync::Weak;

use super::location_manager::Shared;
use crate::domain::errors::{GeocodeError, LocationError};
use crate::domain::location::Location;
use crate::domain::placemark::Placemark;
use crate::domain::session::SessionToken;

/// Receives location fixes for one session.
#[derive(Debug, Clone)]
pub struct LocationSink {
    token: SessionToken,
    shared: Weak<Shared>,
}

impl LocationSink {
    pub(crate) const fn new(token: SessionToken, shared: Weak<Shared>) -> Self {
        Self { token, shared }
    }

    /// Session this sink was issued for.
    #[must_use]
    pub const fn token(&self) -> SessionToken {
        self.token
    }

    /// Report a fix or a failure.
    pub fn deliver(&self, result: Result<Location, LocationError>) {
        let Some(shared) = self.shared.upgrade() else {
            tracing::debug!(token = %self.token, "Location manager gone, discarding fix");
            return;
        };
        shared.deliver_location(self.token, result);
    }
}

/// Receives reverse geocoding results for one session.
#[derive(Debug, Clone)]
pub struct GeocodeSink {
    token: SessionToken,
    shared: Weak<Shared>,
}

impl GeocodeSink {
    pub(crate) const fn new(token: SessionToken, shared: Weak<Shared>) -> Self {
        Self { token, shared }
    }

    /// Session this sink was issued for.
    #[must_use]
    pub const fn token(&self) -> SessionToken {
        self.token
    }

    /// Report the placemarks found (possibly none) or a failure.
    pub fn deliver(&self, result: Result<Vec<Placemark>, GeocodeError>) {
        let Some(shared) = self.shared.upgrade() else {
            tracing::debug!(token = %self.token, "Location manager gone, discarding placemarks");
            return;
        };
        shared.deliver_geocode(self.token, result);
    }
}
