//! Location Manager
//!
//! Facade over the platform location service and reverse geocoder. Callers
//! configure it, issue one of the fetch verbs, and hear back through a
//! weakly held [`LocationManagerDelegate`].
//!
//! # Sessions
//!
//! At most one request is outstanding at a time. Issuing a fetch while
//! another is outstanding supersedes it: the old platform work is torn
//! down and its late results are discarded by token comparison.
//!
//! # Delivery
//!
//! Platform results arrive through [`LocationSink`] and [`GeocodeSink`] on
//! whatever thread the platform uses, and delegate callbacks run on that
//! same thread. A reentrant delivery gate serializes deliveries against
//! `stop_updating_location` and the fetch verbs, so once a stop returns no
//! callback fires for the stopped session. Verbs hold the gate through
//! their platform calls, so concurrent verbs reach the platform in the same
//! order as their session transitions. Delegates may call back into the
//! manager from inside a callback.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use super::delivery::{GeocodeSink, LocationSink};
use crate::application::ports::{GeocoderPort, LocationManagerDelegate, LocationServicePort};
use crate::domain::config::{DesiredAccuracy, DistanceFilter, LocationConfig};
use crate::domain::errors::{GeocodeError, LocationError};
use crate::domain::location::Location;
use crate::domain::placemark::Placemark;
use crate::domain::session::{
    ActiveWork, GeocodeOutcome, LocationOutcome, RequestKind, SessionMachine, SessionToken,
};
use crate::infrastructure::metrics::{self, Callback, ResultSource};

// =============================================================================
// Shared Core
// =============================================================================

/// State shared between the facade and the sinks it hands out.
pub struct Shared {
    /// Held for the whole of a delivery and for a verb's transition plus platform calls.
    gate: ReentrantMutex<()>,
    machine: Mutex<SessionMachine>,
    delegate: RwLock<Option<Weak<dyn LocationManagerDelegate>>>,
    service: Arc<dyn LocationServicePort>,
    geocoder: Arc<dyn GeocoderPort>,
}

impl Shared {
    fn teardown(&self, work: ActiveWork) {
        if work.updating {
            self.service.stop_updating();
        }
        if work.geocoding {
            self.geocoder.cancel_geocode();
        }
    }

    /// Invoke a delegate callback if a delegate is still alive.
    fn notify(&self, callback: Callback, f: impl FnOnce(&dyn LocationManagerDelegate)) {
        let delegate = self.delegate.read().as_ref().and_then(Weak::upgrade);
        let Some(delegate) = delegate else {
            tracing::debug!(
                callback = callback.as_str(),
                "No delegate attached, dropping result"
            );
            return;
        };

        metrics::record_delivery(callback);
        f(delegate.as_ref());
    }

    pub(crate) fn deliver_location(
        self: &Arc<Self>,
        token: SessionToken,
        result: Result<Location, LocationError>,
    ) {
        let _gate = self.gate.lock();
        let outcome = self.machine.lock().on_location(token, result);

        match outcome {
            LocationOutcome::Stale => {
                metrics::record_stale_delivery(ResultSource::LocationService);
                tracing::debug!(token = %token, "Discarding location result for inactive session");
            }
            LocationOutcome::Ignored => {
                tracing::debug!(token = %token, "Ignoring location update while geocoding");
            }
            LocationOutcome::Location(location) => {
                self.service.stop_updating();
                tracing::info!(
                    token = %token,
                    coordinate = %location.coordinate,
                    accuracy_m = location.horizontal_accuracy,
                    "Current location received"
                );
                self.notify(Callback::LocationReceived, |d| {
                    d.did_receive_current_location(&location);
                });
            }
            LocationOutcome::LocationFailed(error) => {
                self.service.stop_updating();
                metrics::record_platform_error(ResultSource::LocationService, error.kind());
                tracing::warn!(token = %token, error = %error, "Location fetch failed");
                self.notify(Callback::LocationFailed, |d| {
                    d.fetching_current_location_failed(&error);
                });
            }
            LocationOutcome::Geocode(location) => {
                self.service.stop_updating();
                tracing::debug!(
                    token = %token,
                    coordinate = %location.coordinate,
                    "Reverse geocoding current location"
                );
                self.geocoder
                    .reverse_geocode(&location, GeocodeSink::new(token, Arc::downgrade(self)));
            }
            LocationOutcome::PlacemarkFailed(error) => {
                self.service.stop_updating();
                metrics::record_platform_error(ResultSource::LocationService, error.kind());
                tracing::warn!(token = %token, error = %error, "Placemark fetch failed");
                self.notify(Callback::PlacemarkFailed, |d| {
                    d.fetching_current_placemark_failed(&error);
                });
            }
        }
    }

    pub(crate) fn deliver_geocode(
        &self,
        token: SessionToken,
        result: Result<Vec<Placemark>, GeocodeError>,
    ) {
        let _gate = self.gate.lock();
        let outcome = self.machine.lock().on_geocode(token, result);

        match outcome {
            GeocodeOutcome::Stale => {
                metrics::record_stale_delivery(ResultSource::Geocoder);
                tracing::debug!(token = %token, "Discarding geocode result for inactive session");
            }
            GeocodeOutcome::Placemark {
                placemark,
                location,
            } => {
                tracing::info!(
                    token = %token,
                    locality = placemark.locality.as_deref().unwrap_or_default(),
                    country = placemark.iso_country_code.as_deref().unwrap_or_default(),
                    "Current placemark received"
                );
                self.notify(Callback::PlacemarkReceived, |d| {
                    d.did_receive_current_placemark(&placemark);
                });

                match placemark.street_address() {
                    Some(address) => self.notify(Callback::StreetAddress, |d| {
                        d.did_receive_street_address(&address, &location);
                    }),
                    None => tracing::debug!(
                        token = %token,
                        "Placemark has no address components, skipping street address"
                    ),
                }
            }
            GeocodeOutcome::Failed(error) => {
                metrics::record_platform_error(ResultSource::Geocoder, error.kind());
                tracing::warn!(token = %token, error = %error, "Placemark fetch failed");
                self.notify(Callback::PlacemarkFailed, |d| {
                    d.fetching_current_placemark_failed(&error);
                });
            }
        }
    }
}

// =============================================================================
// Location Manager
// =============================================================================

/// Location request facade.
///
/// # Example
///
/// ```rust,ignore
/// let manager = LocationManager::new(service, geocoder);
/// manager.set_distance_filter(DistanceFilter::meters(100.0)?);
/// manager.set_delegate(&delegate);
///
/// manager.fetch_current_placemark();
/// // ... results arrive on the delegate ...
/// manager.stop_updating_location();
/// ```
pub struct LocationManager {
    shared: Arc<Shared>,
    config: RwLock<LocationConfig>,
}

impl LocationManager {
    /// Create a manager over the given platform collaborators.
    #[must_use]
    pub fn new(service: Arc<dyn LocationServicePort>, geocoder: Arc<dyn GeocoderPort>) -> Self {
        Self {
            shared: Arc::new(Shared {
                gate: ReentrantMutex::new(()),
                machine: Mutex::new(SessionMachine::new()),
                delegate: RwLock::new(None),
                service,
                geocoder,
            }),
            config: RwLock::new(LocationConfig::default()),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(self, config: LocationConfig) -> Self {
        *self.config.write() = config;
        self
    }

    // -------------------------------------------------------------------------
    // Delegate
    // -------------------------------------------------------------------------

    /// Attach a delegate. The manager keeps only a weak reference.
    pub fn set_delegate<D>(&self, delegate: &Arc<D>)
    where
        D: LocationManagerDelegate + 'static,
    {
        let weak = Arc::downgrade(delegate);
        self.set_delegate_weak(weak);
    }

    /// Attach an already-downgraded delegate.
    pub fn set_delegate_weak(&self, delegate: Weak<dyn LocationManagerDelegate>) {
        *self.shared.delegate.write() = Some(delegate);
    }

    /// Detach the delegate. Results are dropped until a new one is set.
    pub fn clear_delegate(&self) {
        *self.shared.delegate.write() = None;
    }

    /// Whether a delegate is attached and still alive.
    #[must_use]
    pub fn has_delegate(&self) -> bool {
        self.shared
            .delegate
            .read()
            .as_ref()
            .is_some_and(|d| d.strong_count() > 0)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> LocationConfig {
        self.config.read().clone()
    }

    /// Replace the configuration used by the next session.
    pub fn set_config(&self, config: LocationConfig) {
        *self.config.write() = config;
    }

    /// Set the text explaining why location is requested.
    pub fn set_purpose(&self, purpose: impl Into<String>) {
        self.config.write().purpose = Some(purpose.into());
    }

    /// Set the minimum movement before a new update is delivered.
    pub fn set_distance_filter(&self, distance_filter: DistanceFilter) {
        self.config.write().distance_filter = distance_filter;
    }

    /// Set the requested precision tier.
    pub fn set_desired_accuracy(&self, desired_accuracy: DesiredAccuracy) {
        self.config.write().desired_accuracy = desired_accuracy;
    }

    // -------------------------------------------------------------------------
    // Verbs
    // -------------------------------------------------------------------------

    /// Fetch a single location fix.
    ///
    /// Supersedes any outstanding request.
    pub fn fetch_current_location(&self) {
        self.begin(RequestKind::Location);
    }

    /// Fetch a fix, reverse geocode it and report the placemark.
    ///
    /// Supersedes any outstanding request.
    pub fn fetch_current_placemark(&self) {
        self.begin(RequestKind::Placemark);
    }

    /// Cancel the outstanding request, if any.
    ///
    /// No callback fires for the cancelled session once this returns.
    pub fn stop_updating_location(&self) {
        let _gate = self.shared.gate.lock();
        let (token, work) = {
            let mut machine = self.shared.machine.lock();
            let work = machine.cancel();
            (machine.current_token(), work)
        };

        let Some(work) = work else {
            tracing::debug!("Stop requested with no outstanding location request");
            return;
        };

        tracing::info!(token = %token, "Location updates stopped");
        self.shared.teardown(work);
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_requesting(&self) -> bool {
        self.shared.machine.lock().is_requesting()
    }

    /// Kind of the outstanding request, if any.
    #[must_use]
    pub fn active_request(&self) -> Option<RequestKind> {
        self.shared.machine.lock().active_kind()
    }

    /// Token of the most recently issued session.
    #[must_use]
    pub fn current_token(&self) -> SessionToken {
        self.shared.machine.lock().current_token()
    }

    fn begin(&self, kind: RequestKind) {
        let request = self.config.read().to_request();

        // Transition and platform calls stay under the gate so that verbs
        // from other threads reach the platform in session order.
        let _gate = self.shared.gate.lock();
        let start = self.shared.machine.lock().begin(kind);

        if let Some(work) = start.superseded {
            tracing::info!(
                token = %start.token,
                kind = kind.as_str(),
                "Superseding outstanding location request"
            );
            self.shared.teardown(work);
        }

        metrics::record_session_started(kind);
        tracing::info!(
            token = %start.token,
            kind = kind.as_str(),
            distance_filter_m = ?request.distance_filter.as_meters(),
            desired_accuracy = %request.desired_accuracy,
            "Location session started"
        );

        let sink = LocationSink::new(start.token, Arc::downgrade(&self.shared));
        self.shared.service.start_updating(request, sink);
    }
}

impl Drop for LocationManager {
    fn drop(&mut self) {
        self.stop_updating_location();
    }
}

impl std::fmt::Debug for LocationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationManager")
            .field("config", &*self.config.read())
            .field("state", self.shared.machine.lock().state())
            .field("has_delegate", &self.has_delegate())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
