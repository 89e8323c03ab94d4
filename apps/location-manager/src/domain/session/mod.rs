//! Session State Machine
//!
//! Tracks the single outstanding request of a location manager:
//!
//! ```text
//!            fetch_*                 result / error / stop
//!   Idle ─────────────► Requesting ─────────────────────────► Idle
//!                        │
//!                        ├─ Location
//!                        └─ Placemark: AwaitingLocation → AwaitingGeocode
//! ```
//!
//! Every fetch issues a fresh [`SessionToken`]. Results are tagged with the
//! token they were issued for and are discarded unless it matches the
//! current session, which makes supersede and cancel races explicit.
//!
//! This module is pure: it performs no I/O and takes no locks. The
//! application layer applies the returned outcomes to the platform ports
//! and the delegate.

use super::errors::{GeocodeError, LocationError, PlacemarkError};
use super::location::Location;
use super::placemark::Placemark;

// =============================================================================
// Types
// =============================================================================

/// Monotonically increasing session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    /// Raw epoch value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which verb started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// `fetch_current_location`.
    Location,
    /// `fetch_current_placemark`.
    Placemark,
}

impl RequestKind {
    /// Label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Placemark => "placemark",
        }
    }
}

/// Progress of a placemark request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacemarkPhase {
    /// Waiting for the platform to produce a fix.
    AwaitingLocation,
    /// Fix received; waiting for the geocoder.
    AwaitingGeocode {
        /// The fix being geocoded.
        location: Location,
    },
}

/// What the current session is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    /// Waiting for a single fix.
    Location,
    /// Running the location → geocode pipeline.
    Placemark(PlacemarkPhase),
}

impl Activity {
    const fn kind(&self) -> RequestKind {
        match self {
            Self::Location => RequestKind::Location,
            Self::Placemark(_) => RequestKind::Placemark,
        }
    }

    /// Platform work this activity currently has running.
    const fn work(&self) -> ActiveWork {
        match self {
            Self::Location | Self::Placemark(PlacemarkPhase::AwaitingLocation) => ActiveWork {
                updating: true,
                geocoding: false,
            },
            Self::Placemark(PlacemarkPhase::AwaitingGeocode { .. }) => ActiveWork {
                updating: false,
                geocoding: true,
            },
        }
    }
}

/// Externally visible session state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No request outstanding.
    #[default]
    Idle,
    /// A request is outstanding.
    Requesting {
        /// Token of the outstanding request.
        token: SessionToken,
        /// What the request is waiting on.
        activity: Activity,
    },
}

/// Platform work that must be torn down when a session ends early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveWork {
    /// Location updates are running.
    pub updating: bool,
    /// A reverse geocode is in flight.
    pub geocoding: bool,
}

/// Result of starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStart {
    /// Token for the new session.
    pub token: SessionToken,
    /// Work left over from the superseded session, if one was outstanding.
    pub superseded: Option<ActiveWork>,
}

/// What to do with a location delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// Token does not match an outstanding session; drop it.
    Stale,
    /// Session is already past the location phase; drop it.
    Ignored,
    /// Location session completed; notify the delegate.
    Location(Location),
    /// Location session failed; notify the delegate.
    LocationFailed(LocationError),
    /// Placemark session got its fix; reverse geocode it.
    Geocode(Location),
    /// Placemark session failed before geocoding; notify the delegate.
    PlacemarkFailed(PlacemarkError),
}

/// What to do with a geocode delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    /// Token does not match a session awaiting a geocode; drop it.
    Stale,
    /// Placemark session completed.
    Placemark {
        /// The first placemark returned by the geocoder.
        placemark: Placemark,
        /// The fix that was geocoded.
        location: Location,
    },
    /// Placemark session failed while geocoding.
    Failed(PlacemarkError),
}

// =============================================================================
// Session Machine
// =============================================================================

/// Owns the epoch counter and the current [`SessionState`].
#[derive(Debug, Default)]
pub struct SessionMachine {
    epoch: u64,
    state: SessionState,
}

impl SessionMachine {
    /// Create an idle machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Token of the most recently issued session.
    #[must_use]
    pub const fn current_token(&self) -> SessionToken {
        SessionToken(self.epoch)
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_requesting(&self) -> bool {
        matches!(self.state, SessionState::Requesting { .. })
    }

    /// Kind of the outstanding request, if any.
    #[must_use]
    pub const fn active_kind(&self) -> Option<RequestKind> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Requesting { activity, .. } => Some(activity.kind()),
        }
    }

    /// Start a new session, superseding any outstanding one.
    pub fn begin(&mut self, kind: RequestKind) -> SessionStart {
        let superseded = self.take_work();
        let token = self.advance();
        let activity = match kind {
            RequestKind::Location => Activity::Location,
            RequestKind::Placemark => Activity::Placemark(PlacemarkPhase::AwaitingLocation),
        };
        self.state = SessionState::Requesting { token, activity };

        SessionStart { token, superseded }
    }

    /// Cancel the outstanding session.
    ///
    /// Returns the work to tear down, or `None` if already idle (no-op).
    pub fn cancel(&mut self) -> Option<ActiveWork> {
        let work = self.take_work()?;
        self.advance();
        Some(work)
    }

    /// Apply a location delivery tagged with `token`.
    pub fn on_location(
        &mut self,
        token: SessionToken,
        result: Result<Location, LocationError>,
    ) -> LocationOutcome {
        let SessionState::Requesting {
            token: current,
            activity,
        } = &mut self.state
        else {
            return LocationOutcome::Stale;
        };
        if *current != token {
            return LocationOutcome::Stale;
        }

        let (outcome, finished) = match activity {
            Activity::Location => match result {
                Ok(location) => (LocationOutcome::Location(location), true),
                Err(error) => (LocationOutcome::LocationFailed(error), true),
            },
            Activity::Placemark(PlacemarkPhase::AwaitingGeocode { .. }) => {
                (LocationOutcome::Ignored, false)
            }
            Activity::Placemark(phase) => match result {
                Ok(location) => {
                    *phase = PlacemarkPhase::AwaitingGeocode {
                        location: location.clone(),
                    };
                    (LocationOutcome::Geocode(location), false)
                }
                Err(error) => (
                    LocationOutcome::PlacemarkFailed(PlacemarkError::Location(error)),
                    true,
                ),
            },
        };

        if finished {
            self.state = SessionState::Idle;
        }
        outcome
    }

    /// Apply a geocode delivery tagged with `token`.
    pub fn on_geocode(
        &mut self,
        token: SessionToken,
        result: Result<Vec<Placemark>, GeocodeError>,
    ) -> GeocodeOutcome {
        let location = match std::mem::take(&mut self.state) {
            SessionState::Requesting {
                token: current,
                activity: Activity::Placemark(PlacemarkPhase::AwaitingGeocode { location }),
            } if current == token => location,
            other => {
                self.state = other;
                return GeocodeOutcome::Stale;
            }
        };

        let first = result.and_then(|placemarks| {
            placemarks
                .into_iter()
                .next()
                .ok_or(GeocodeError::NoResult)
        });

        match first {
            Ok(placemark) => GeocodeOutcome::Placemark {
                placemark,
                location,
            },
            Err(error) => GeocodeOutcome::Failed(PlacemarkError::Geocode(error)),
        }
    }

    fn take_work(&mut self) -> Option<ActiveWork> {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => None,
            SessionState::Requesting { activity, .. } => Some(activity.work()),
        }
    }

    fn advance(&mut self) -> SessionToken {
        self.epoch = self.epoch.wrapping_add(1);
        SessionToken(self.epoch)
    }
}
