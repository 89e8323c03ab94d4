//! Gazetteer Geocoder
//!
//! A tokio-driven reverse geocoder over a fixed table of placemarks. A
//! lookup returns the entry nearest to the queried location within a
//! search radius, or no placemarks if nothing is close enough.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::GeocoderPort;
use crate::application::services::GeocodeSink;
use crate::domain::errors::GeocodeError;
use crate::domain::location::{Coordinate, Location};
use crate::domain::placemark::Placemark;
use crate::infrastructure::config::SimulationSettings;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equirectangular distance in meters. Accurate enough for short ranges.
fn approximate_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let mean_lat = ((a.latitude + b.latitude) / 2.0).to_radians();
    let x = (b.longitude - a.longitude).to_radians() * mean_lat.cos();
    let y = (b.latitude - a.latitude).to_radians();
    EARTH_RADIUS_M * x.hypot(y)
}

/// Reverse geocoder backed by an in-memory gazetteer.
#[derive(Debug)]
pub struct GazetteerGeocoder {
    runtime: Handle,
    entries: Vec<(Coordinate, Placemark)>,
    search_radius_m: f64,
    delay: Duration,
    failure: RwLock<Option<GeocodeError>>,
    inflight: Mutex<Option<CancellationToken>>,
    lookups: AtomicUsize,
    cancels: AtomicUsize,
}

impl GazetteerGeocoder {
    /// Create an empty gazetteer.
    #[must_use]
    pub fn new(runtime: Handle, search_radius_m: f64, delay: Duration) -> Self {
        Self {
            runtime,
            entries: Vec::new(),
            search_radius_m,
            delay,
            failure: RwLock::new(None),
            inflight: Mutex::new(None),
            lookups: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
        }
    }

    /// Create a gazetteer seeded with a handful of well-known places.
    #[must_use]
    pub fn with_landmarks(runtime: Handle, search_radius_m: f64, delay: Duration) -> Self {
        Self::new(runtime, search_radius_m, delay)
            .with_entry(
                Placemark::new()
                    .with_name("Dam")
                    .with_street("1", "Dam")
                    .with_locality("Amsterdam", "Noord-Holland", "1012 JS")
                    .with_country("Netherlands", "NL"),
                Coordinate::new(52.373_08, 4.892_53),
            )
            .with_entry(
                Placemark::new()
                    .with_name("Apple Park")
                    .with_street("1", "Apple Park Way")
                    .with_locality("Cupertino", "CA", "95014")
                    .with_country("United States", "US"),
                Coordinate::new(37.334_9, -122.009_0),
            )
            .with_entry(
                Placemark::new()
                    .with_name("Brandenburger Tor")
                    .with_street("1", "Pariser Platz")
                    .with_locality("Berlin", "Berlin", "10117")
                    .with_country("Germany", "DE"),
                Coordinate::new(52.516_3, 13.377_7),
            )
            .with_entry(
                Placemark::new()
                    .with_name("Shibuya Crossing")
                    .with_locality("Shibuya", "Tokyo", "150-0043")
                    .with_country("Japan", "JP"),
                Coordinate::new(35.659_5, 139.700_5),
            )
    }

    /// Create the landmark gazetteer using the radius and delay in `settings`.
    #[must_use]
    pub fn from_settings(runtime: Handle, settings: &SimulationSettings) -> Self {
        Self::with_landmarks(runtime, settings.search_radius_m, settings.delay)
    }

    /// Add a placemark anchored at `coordinate`.
    #[must_use]
    pub fn with_entry(mut self, placemark: Placemark, coordinate: Coordinate) -> Self {
        let anchored = placemark.with_location(Location::new(coordinate, 0.0));
        self.entries.push((coordinate, anchored));
        self
    }

    /// Fail every subsequent lookup with `error`, or clear with `None`.
    pub fn set_failure(&self, error: Option<GeocodeError>) {
        *self.failure.write() = error;
    }

    /// Number of `reverse_geocode` calls.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of `cancel_geocode` calls.
    #[must_use]
    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Nearest entry within the search radius.
    #[must_use]
    pub fn nearest(&self, coordinate: Coordinate) -> Option<&Placemark> {
        self.entries
            .iter()
            .map(|(anchor, placemark)| (approximate_distance_m(*anchor, coordinate), placemark))
            .filter(|(distance, _)| *distance <= self.search_radius_m)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, placemark)| placemark)
    }

    fn lookup(&self, location: &Location) -> Result<Vec<Placemark>, GeocodeError> {
        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }
        Ok(self
            .nearest(location.coordinate)
            .cloned()
            .into_iter()
            .collect())
    }
}

impl GeocoderPort for GazetteerGeocoder {
    fn reverse_geocode(&self, location: &Location, sink: GeocodeSink) {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        if let Some(previous) = self.inflight.lock().replace(cancel.clone()) {
            previous.cancel();
        }

        let result = self.lookup(location);
        let delay = self.delay;

        self.runtime.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => sink.deliver(Err(GeocodeError::Cancelled)),
                () = tokio::time::sleep(delay) => sink.deliver(result),
            }
        });
    }

    fn cancel_geocode(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        if let Some(inflight) = self.inflight.lock().take() {
            inflight.cancel();
        }
    }
}
