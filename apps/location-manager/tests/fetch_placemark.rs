//! Placemark Fetch Integration Tests
//!
//! Drives the two-phase placemark pipeline (location fix, then reverse
//! geocode) against the simulated adapters.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;

use location_manager::{
    Coordinate, GazetteerGeocoder, GeocodeError, Location, LocationError, LocationManager,
    LocationManagerDelegate, Placemark, PlacemarkError, RequestKind, SimulatedLocationService,
};

// =============================================================================
// Helpers
// =============================================================================

const FIX_DELAY: Duration = Duration::from_millis(10);
const QUIET_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq)]
enum Event {
    Location(Location),
    Placemark(Placemark),
    PlacemarkFailed(PlacemarkError),
    StreetAddress(String, Location),
}

struct Recorder {
    tx: mpsc::UnboundedSender<Event>,
}

impl LocationManagerDelegate for Recorder {
    fn did_receive_current_location(&self, location: &Location) {
        let _ = self.tx.send(Event::Location(location.clone()));
    }

    fn did_receive_current_placemark(&self, placemark: &Placemark) {
        let _ = self.tx.send(Event::Placemark(placemark.clone()));
    }

    fn fetching_current_placemark_failed(&self, error: &PlacemarkError) {
        let _ = self.tx.send(Event::PlacemarkFailed(error.clone()));
    }

    fn did_receive_street_address(&self, address: &str, location: &Location) {
        let _ = self
            .tx
            .send(Event::StreetAddress(address.to_string(), location.clone()));
    }
}

fn dam_square() -> Location {
    Location::new(Coordinate::new(52.373_2, 4.893_0), 8.0)
}

struct Harness {
    service: Arc<SimulatedLocationService>,
    geocoder: Arc<GazetteerGeocoder>,
    manager: LocationManager,
    delegate: Arc<Recorder>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl Harness {
    fn new(outcome: Result<Location, LocationError>, geocoder: GazetteerGeocoder) -> Self {
        let service = Arc::new(SimulatedLocationService::new(
            Handle::current(),
            outcome,
            FIX_DELAY,
        ));
        let geocoder = Arc::new(geocoder);
        let manager = LocationManager::new(service.clone(), geocoder.clone());

        let (tx, rx) = mpsc::unbounded_channel();
        let delegate = Arc::new(Recorder { tx });
        manager.set_delegate(&delegate);

        Self {
            service,
            geocoder,
            manager,
            delegate,
            rx,
        }
    }

    fn landmarks(outcome: Result<Location, LocationError>, geocode_delay: Duration) -> Self {
        Self::new(
            outcome,
            GazetteerGeocoder::with_landmarks(Handle::current(), 5_000.0, geocode_delay),
        )
    }

    async fn next_event(&mut self) -> Event {
        timeout(Duration::from_secs(2), self.rx.recv())
            .await
            .expect("timed out waiting for delegate event")
            .expect("delegate channel closed")
    }

    async fn assert_quiet(&mut self) {
        if let Ok(Some(event)) = timeout(QUIET_PERIOD, self.rx.recv()).await {
            panic!("unexpected delegate event: {event:?}");
        }
    }
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn delivers_placemark_then_street_address() {
    let mut h = Harness::landmarks(Ok(dam_square()), FIX_DELAY);

    h.manager.fetch_current_placemark();
    assert_eq!(h.manager.active_request(), Some(RequestKind::Placemark));

    let Event::Placemark(placemark) = h.next_event().await else {
        panic!("expected placemark first");
    };
    assert_eq!(placemark.locality.as_deref(), Some("Amsterdam"));
    assert_eq!(placemark.iso_country_code.as_deref(), Some("NL"));

    let Event::StreetAddress(address, location) = h.next_event().await else {
        panic!("expected street address second");
    };
    assert_eq!(address, "1 Dam\nAmsterdam, Noord-Holland 1012 JS\nNetherlands");
    assert_eq!(location.coordinate, dam_square().coordinate);

    assert!(!h.manager.is_requesting());
    assert_eq!(h.service.starts(), 1);
    assert!(!h.service.is_running());
    assert_eq!(h.geocoder.lookups(), 1);
    h.assert_quiet().await;
}

#[tokio::test]
async fn placemark_without_address_skips_street_address() {
    let coordinate = Coordinate::new(-77.846_3, 166.668_2);
    let geocoder = GazetteerGeocoder::new(Handle::current(), 1_000.0, FIX_DELAY)
        .with_entry(Placemark::new().with_name("McMurdo Station"), coordinate);
    let mut h = Harness::new(Ok(Location::new(coordinate, 30.0)), geocoder);

    h.manager.fetch_current_placemark();

    let Event::Placemark(placemark) = h.next_event().await else {
        panic!("expected placemark");
    };
    assert_eq!(placemark.name.as_deref(), Some("McMurdo Station"));
    h.assert_quiet().await;
}

#[tokio::test]
async fn location_callback_is_not_used_for_placemarks() {
    let mut h = Harness::landmarks(Ok(dam_square()), FIX_DELAY);

    h.manager.fetch_current_placemark();

    let first = h.next_event().await;
    assert!(!matches!(first, Event::Location(_)), "{first:?}");
    let second = h.next_event().await;
    assert!(!matches!(second, Event::Location(_)), "{second:?}");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn location_failure_fails_placemark() {
    let mut h = Harness::landmarks(Err(LocationError::LocationUnknown), FIX_DELAY);

    h.manager.fetch_current_placemark();

    assert_eq!(
        h.next_event().await,
        Event::PlacemarkFailed(PlacemarkError::Location(LocationError::LocationUnknown))
    );
    assert_eq!(h.geocoder.lookups(), 0);
    assert!(!h.manager.is_requesting());
    h.assert_quiet().await;
}

#[tokio::test]
async fn empty_geocode_result_is_no_result() {
    let mut h = Harness::landmarks(
        Ok(Location::new(Coordinate::new(0.0, -30.0), 50.0)),
        FIX_DELAY,
    );

    h.manager.fetch_current_placemark();

    assert_eq!(
        h.next_event().await,
        Event::PlacemarkFailed(PlacemarkError::Geocode(GeocodeError::NoResult))
    );
    assert!(!h.manager.is_requesting());
}

#[tokio::test]
async fn geocoder_failure_fails_placemark() {
    let mut h = Harness::landmarks(Ok(dam_square()), FIX_DELAY);
    h.geocoder.set_failure(Some(GeocodeError::Network {
        message: "connection reset".to_string(),
    }));

    h.manager.fetch_current_placemark();

    assert_eq!(
        h.next_event().await,
        Event::PlacemarkFailed(PlacemarkError::Geocode(GeocodeError::Network {
            message: "connection reset".to_string(),
        }))
    );
}

// =============================================================================
// Stop and Supersede
// =============================================================================

#[tokio::test]
async fn stop_during_geocode_cancels_lookup() {
    let mut h = Harness::landmarks(Ok(dam_square()), Duration::from_millis(500));

    h.manager.fetch_current_placemark();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.geocoder.lookups(), 1);
    assert!(h.manager.is_requesting());

    h.manager.stop_updating_location();

    assert_eq!(h.geocoder.cancels(), 1);
    assert!(!h.manager.is_requesting());
    h.assert_quiet().await;
}

#[tokio::test]
async fn fetch_during_geocode_restarts_pipeline() {
    let mut h = Harness::landmarks(Ok(dam_square()), Duration::from_millis(40));

    h.manager.fetch_current_placemark();
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.manager.fetch_current_placemark();

    assert!(matches!(h.next_event().await, Event::Placemark(_)));
    assert!(matches!(h.next_event().await, Event::StreetAddress(..)));
    h.assert_quiet().await;

    assert_eq!(h.service.starts(), 2);
    assert_eq!(h.geocoder.lookups(), 2);
    assert!(h.geocoder.cancels() >= 1);
}

#[tokio::test]
async fn stop_before_fix_never_geocodes() {
    let mut h = Harness::landmarks(Ok(dam_square()), FIX_DELAY);

    h.manager.fetch_current_placemark();
    h.manager.stop_updating_location();

    h.assert_quiet().await;
    assert_eq!(h.geocoder.lookups(), 0);
    assert_eq!(h.service.stops(), 1);
    drop(h.delegate);
}
