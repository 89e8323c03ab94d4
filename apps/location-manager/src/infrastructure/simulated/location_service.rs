//! Simulated Location Service
//!
//! A tokio-driven stand-in for a platform location service. Each session
//! delivers a scripted outcome after a delay, optionally repeating at an
//! interval until stopped. Used by the demo binary and integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::LocationServicePort;
use crate::application::services::LocationSink;
use crate::domain::config::LocationRequest;
use crate::domain::errors::LocationError;
use crate::domain::location::Location;
use crate::infrastructure::config::SimulationSettings;

/// Simulated platform location service.
#[derive(Debug)]
pub struct SimulatedLocationService {
    runtime: Handle,
    outcome: Arc<RwLock<Result<Location, LocationError>>>,
    delay: Duration,
    update_interval: Option<Duration>,
    session: Mutex<Option<CancellationToken>>,
    last_request: Mutex<Option<LocationRequest>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl SimulatedLocationService {
    /// Create a service that reports `outcome` once per session after `delay`.
    #[must_use]
    pub fn new(runtime: Handle, outcome: Result<Location, LocationError>, delay: Duration) -> Self {
        Self {
            runtime,
            outcome: Arc::new(RwLock::new(outcome)),
            delay,
            update_interval: None,
            session: Mutex::new(None),
            last_request: Mutex::new(None),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Create a service reporting the fix described by `settings`.
    #[must_use]
    pub fn from_settings(runtime: Handle, settings: &SimulationSettings) -> Self {
        let fix = Location::new(settings.coordinate, settings.horizontal_accuracy);
        Self::new(runtime, Ok(fix), settings.delay)
    }

    /// Keep delivering the outcome every `interval` after the first delivery.
    #[must_use]
    pub const fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = Some(interval);
        self
    }

    /// Change the outcome reported by subsequent deliveries.
    pub fn set_outcome(&self, outcome: Result<Location, LocationError>) {
        *self.outcome.write() = outcome;
    }

    /// Number of `start_updating` calls.
    #[must_use]
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of `stop_updating` calls.
    #[must_use]
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Whether a session is open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Request passed to the most recent `start_updating`.
    #[must_use]
    pub fn last_request(&self) -> Option<LocationRequest> {
        self.last_request.lock().clone()
    }
}

/// The scripted outcome, with a fix stamped as taken now.
fn fresh(outcome: &Result<Location, LocationError>) -> Result<Location, LocationError> {
    match outcome {
        Ok(location) => Ok(location.clone().with_timestamp(chrono::Utc::now())),
        Err(error) => Err(error.clone()),
    }
}

impl LocationServicePort for SimulatedLocationService {
    fn start_updating(&self, request: LocationRequest, sink: LocationSink) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request);

        let cancel = CancellationToken::new();
        if let Some(previous) = self.session.lock().replace(cancel.clone()) {
            tracing::debug!("Simulated location session restarted");
            previous.cancel();
        }

        let outcome = Arc::clone(&self.outcome);
        let delay = self.delay;
        let interval = self.update_interval;

        self.runtime.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {
                    let next = fresh(&outcome.read());
                    sink.deliver(next);
                }
            }

            let Some(interval) = interval else {
                return;
            };

            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let next = fresh(&outcome.read());
                        sink.deliver(next);
                    }
                }
            }
        });
    }

    fn stop_updating(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = self.session.lock().take() {
            session.cancel();
        }
    }
}
