//! Location Manager Demo Binary
//!
//! Runs the facade against the simulated platform adapters: fetches the
//! current placemark, then the current location, and prints every delegate
//! event as a JSON line on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin location-manager
//! ```
//!
//! # Environment Variables
//!
//! - `LOCATION_PURPOSE`: Purpose string shown in the authorization prompt
//! - `LOCATION_DISTANCE_FILTER_M`: Minimum movement in meters (default: none)
//! - `LOCATION_DESIRED_ACCURACY`: Accuracy tier (default: best)
//! - `SIMULATED_LATITUDE` / `SIMULATED_LONGITUDE`: Simulated fix (default: Dam Square)
//! - `SIMULATED_ACCURACY_M`: Reported accuracy of the fix (default: 10)
//! - `SIMULATED_DELAY_MS`: Delay before each delivery (default: 250)
//! - `SIMULATED_SEARCH_RADIUS_M`: Gazetteer search radius (default: 5000)
//! - `LOG_FORMAT`: `json` or `text` (default: text)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use location_manager::infrastructure::telemetry;
use location_manager::{
    GazetteerGeocoder, Location, LocationManager, LocationManagerDelegate, ManagerSettings,
    Placemark, PlacemarkError, SimulatedLocationService, describe_metrics,
};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// How long to wait for a single delegate event.
const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// A delegate callback, as printed to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event {
    Location { location: Location },
    LocationFailed { error: String },
    Placemark { placemark: Placemark },
    PlacemarkFailed { error: String },
    StreetAddress { address: String, location: Location },
}

impl Event {
    /// Whether this event ends a request. A placemark with address
    /// components is followed by its street address.
    fn is_terminal(&self) -> bool {
        match self {
            Self::Placemark { placemark } => placemark.street_address().is_none(),
            _ => true,
        }
    }
}

/// Delegate forwarding every callback into a channel.
struct ChannelDelegate {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelDelegate {
    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Event receiver dropped");
        }
    }
}

impl LocationManagerDelegate for ChannelDelegate {
    fn did_receive_current_location(&self, location: &Location) {
        self.send(Event::Location {
            location: location.clone(),
        });
    }

    fn fetching_current_location_failed(&self, error: &location_manager::LocationError) {
        self.send(Event::LocationFailed {
            error: error.to_string(),
        });
    }

    fn did_receive_current_placemark(&self, placemark: &Placemark) {
        self.send(Event::Placemark {
            placemark: placemark.clone(),
        });
    }

    fn fetching_current_placemark_failed(&self, error: &PlacemarkError) {
        self.send(Event::PlacemarkFailed {
            error: error.to_string(),
        });
    }

    fn did_receive_street_address(&self, address: &str, location: &Location) {
        self.send(Event::StreetAddress {
            address: address.to_string(),
            location: location.clone(),
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init();
    describe_metrics();

    tracing::info!("Starting location manager demo");

    let settings = ManagerSettings::from_env().context("invalid location configuration")?;
    log_config(&settings);

    let runtime = Handle::current();
    let service = Arc::new(SimulatedLocationService::from_settings(
        runtime.clone(),
        &settings.simulation,
    ));
    let geocoder = Arc::new(GazetteerGeocoder::from_settings(
        runtime,
        &settings.simulation,
    ));

    let manager = LocationManager::new(service, geocoder).with_config(settings.location);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let delegate = Arc::new(ChannelDelegate { tx });
    manager.set_delegate(&delegate);

    manager.fetch_current_placemark();
    drain_request(&mut rx).await?;

    manager.fetch_current_location();
    drain_request(&mut rx).await?;

    manager.stop_updating_location();
    tracing::info!("Location manager demo finished");

    Ok(())
}

/// Print events until the current request finishes.
async fn drain_request(rx: &mut mpsc::UnboundedReceiver<Event>) -> anyhow::Result<()> {
    loop {
        let event = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
            .await
            .context("timed out waiting for a delegate event")?
            .context("delegate channel closed")?;

        println!("{}", serde_json::to_string(&event)?);

        if event.is_terminal() {
            return Ok(());
        }
    }
}

/// Log the parsed configuration.
fn log_config(settings: &ManagerSettings) {
    tracing::info!(
        purpose = settings.location.purpose.as_deref().unwrap_or("<none>"),
        distance_filter = ?settings.location.distance_filter.as_meters(),
        desired_accuracy = %settings.location.desired_accuracy,
        "Configuration loaded"
    );
    tracing::debug!(
        coordinate = %settings.simulation.coordinate,
        delay_ms = settings.simulation.delay.as_millis(),
        search_radius_m = settings.simulation.search_radius_m,
        "Simulation settings"
    );
}

/// Load .env file from the current directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
