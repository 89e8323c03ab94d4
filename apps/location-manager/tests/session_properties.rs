//! Session Property Tests
//!
//! Random sequences of verbs and platform deliveries against a counting
//! platform. The platform records a violation whenever the facade opens a
//! second session while one is still running.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use proptest::prelude::*;

use location_manager::{
    Coordinate, GeocodeError, GeocodeSink, GeocoderPort, Location, LocationError, LocationManager,
    LocationManagerDelegate, LocationRequest, LocationServicePort, LocationSink, Placemark,
    PlacemarkError, SessionToken,
};

// =============================================================================
// Counting Platform
// =============================================================================

#[derive(Default)]
struct CountingService {
    running: Mutex<Option<SessionToken>>,
    sinks: Mutex<Vec<LocationSink>>,
    violations: AtomicUsize,
}

impl LocationServicePort for CountingService {
    fn start_updating(&self, _request: LocationRequest, sink: LocationSink) {
        let mut running = self.running.lock();
        if running.is_some() {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        *running = Some(sink.token());
        drop(running);
        self.sinks.lock().push(sink);
    }

    fn stop_updating(&self) {
        *self.running.lock() = None;
    }
}

#[derive(Default)]
struct CountingGeocoder {
    inflight: Mutex<Option<SessionToken>>,
    sinks: Mutex<Vec<GeocodeSink>>,
    violations: AtomicUsize,
}

impl GeocoderPort for CountingGeocoder {
    fn reverse_geocode(&self, _location: &Location, sink: GeocodeSink) {
        let mut inflight = self.inflight.lock();
        if inflight.is_some() {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        *inflight = Some(sink.token());
        drop(inflight);
        self.sinks.lock().push(sink);
    }

    fn cancel_geocode(&self) {
        *self.inflight.lock() = None;
    }
}

impl CountingGeocoder {
    /// Finish the lookup for `sink` the way a platform geocoder would.
    fn complete(&self, sink: &GeocodeSink, result: Result<Vec<Placemark>, GeocodeError>) {
        {
            let mut inflight = self.inflight.lock();
            if *inflight == Some(sink.token()) {
                *inflight = None;
            }
        }
        sink.deliver(result);
    }
}

#[derive(Default)]
struct Terminals {
    count: AtomicUsize,
}

impl Terminals {
    fn bump(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

impl LocationManagerDelegate for Terminals {
    fn did_receive_current_location(&self, _location: &Location) {
        self.bump();
    }

    fn fetching_current_location_failed(&self, _error: &LocationError) {
        self.bump();
    }

    fn did_receive_current_placemark(&self, _placemark: &Placemark) {
        self.bump();
    }

    fn fetching_current_placemark_failed(&self, _error: &PlacemarkError) {
        self.bump();
    }
}

// =============================================================================
// Operations
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    FetchLocation,
    FetchPlacemark,
    Stop,
    /// Deliver through the n-th most recent location sink.
    DeliverLocation { back: usize, ok: bool },
    /// Complete the n-th most recent geocode.
    DeliverGeocode { back: usize, found: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::FetchLocation),
        Just(Op::FetchPlacemark),
        Just(Op::Stop),
        (0usize..3, any::<bool>()).prop_map(|(back, ok)| Op::DeliverLocation { back, ok }),
        (0usize..3, any::<bool>()).prop_map(|(back, found)| Op::DeliverGeocode { back, found }),
    ]
}

fn nth_from_end<T: Clone>(items: &Mutex<Vec<T>>, back: usize) -> Option<T> {
    let items = items.lock();
    items.len().checked_sub(back + 1).map(|i| items[i].clone())
}

fn fix() -> Location {
    Location::new(Coordinate::new(48.858_4, 2.294_5), 5.0)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Property: the platform never sees two overlapping sessions, the
    /// facade is requesting exactly while platform work is open, and each
    /// fetch produces at most one terminal callback.
    #[test]
    fn prop_at_most_one_session(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let service = Arc::new(CountingService::default());
        let geocoder = Arc::new(CountingGeocoder::default());
        let manager = LocationManager::new(service.clone(), geocoder.clone());
        let delegate = Arc::new(Terminals::default());
        manager.set_delegate(&delegate);

        let mut fetches = 0usize;

        for op in ops {
            match op {
                Op::FetchLocation => {
                    fetches += 1;
                    manager.fetch_current_location();
                }
                Op::FetchPlacemark => {
                    fetches += 1;
                    manager.fetch_current_placemark();
                }
                Op::Stop => manager.stop_updating_location(),
                Op::DeliverLocation { back, ok } => {
                    if let Some(sink) = nth_from_end(&service.sinks, back) {
                        let result = if ok { Ok(fix()) } else { Err(LocationError::Denied) };
                        sink.deliver(result);
                    }
                }
                Op::DeliverGeocode { back, found } => {
                    if let Some(sink) = nth_from_end(&geocoder.sinks, back) {
                        let result = if found {
                            Ok(vec![Placemark::new().with_locality("Paris", "IDF", "75007")])
                        } else {
                            Ok(Vec::new())
                        };
                        geocoder.complete(&sink, result);
                    }
                }
            }

            let open = service.running.lock().is_some() || geocoder.inflight.lock().is_some();
            prop_assert_eq!(manager.is_requesting(), open);
        }

        prop_assert_eq!(service.violations.load(Ordering::SeqCst), 0);
        prop_assert_eq!(geocoder.violations.load(Ordering::SeqCst), 0);
        prop_assert!(delegate.count.load(Ordering::SeqCst) <= fetches);
    }

    /// Property: after a stop, no sink issued so far delivers anything.
    #[test]
    fn prop_stop_silences_every_sink(
        ops in prop::collection::vec(op_strategy(), 1..32),
        late in prop::collection::vec((0usize..3, any::<bool>()), 1..8),
    ) {
        let service = Arc::new(CountingService::default());
        let geocoder = Arc::new(CountingGeocoder::default());
        let manager = LocationManager::new(service.clone(), geocoder.clone());
        let delegate = Arc::new(Terminals::default());
        manager.set_delegate(&delegate);

        for op in ops {
            match op {
                Op::FetchLocation => manager.fetch_current_location(),
                Op::FetchPlacemark => manager.fetch_current_placemark(),
                Op::Stop => manager.stop_updating_location(),
                Op::DeliverLocation { back, ok } => {
                    if let Some(sink) = nth_from_end(&service.sinks, back) {
                        let result = if ok { Ok(fix()) } else { Err(LocationError::Denied) };
                        sink.deliver(result);
                    }
                }
                Op::DeliverGeocode { back, found } => {
                    if let Some(sink) = nth_from_end(&geocoder.sinks, back) {
                        let result = if found { Ok(vec![Placemark::new()]) } else { Ok(Vec::new()) };
                        geocoder.complete(&sink, result);
                    }
                }
            }
        }

        manager.stop_updating_location();
        let before = delegate.count.load(Ordering::SeqCst);

        for (back, ok) in late {
            if let Some(sink) = nth_from_end(&service.sinks, back) {
                sink.deliver(if ok { Ok(fix()) } else { Err(LocationError::Denied) });
            }
            if let Some(sink) = nth_from_end(&geocoder.sinks, back) {
                sink.deliver(Err(GeocodeError::Cancelled));
            }
        }

        prop_assert_eq!(delegate.count.load(Ordering::SeqCst), before);
        prop_assert!(!manager.is_requesting());
    }
}
