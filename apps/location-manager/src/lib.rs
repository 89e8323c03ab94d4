#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Location Manager - Location Request Facade
//!
//! Wraps a platform location service and reverse geocoder behind three
//! verbs and relays every result to a single, weakly held delegate.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core types and the request state machine
//!   - `location`: Coordinates and location fixes
//!   - `placemark`: Reverse-geocoded places and address formatting
//!   - `config`: Request configuration (purpose, filter, accuracy)
//!   - `errors`: Location, geocode and placemark failures
//!   - `session`: Session tokens and the idle/requesting state machine
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Location service, geocoder and delegate interfaces
//!   - `services`: The `LocationManager` facade and its delivery sinks
//!
//! - **Infrastructure**: Adapters and ambient concerns
//!   - `config`: Environment-driven settings
//!   - `metrics`: Session and delivery counters
//!   - `simulated`: Tokio-driven location service and gazetteer geocoder
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//! fetch_current_placemark()
//!         │
//!         ▼
//! LocationServicePort ──LocationSink──► SessionMachine ──► delegate
//!                                             │
//!                                             ▼
//!                        GeocoderPort ──GeocodeSink──► SessionMachine ──► delegate
//! ```
//!
//! Every sink carries the session token it was issued with. Results
//! carrying an older token are dropped, so nothing is delivered after
//! `stop_updating_location` returns or after a newer fetch supersedes it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core types with no platform dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and ambient concerns.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::config::{
    ConfigError, DesiredAccuracy, DistanceFilter, LocationConfig, LocationRequest,
};
pub use domain::errors::{GeocodeError, LocationError, PlacemarkError};
pub use domain::location::{Coordinate, Location};
pub use domain::placemark::Placemark;
pub use domain::session::{RequestKind, SessionToken};

// Application
pub use application::ports::{GeocoderPort, LocationManagerDelegate, LocationServicePort};
pub use application::services::{GeocodeSink, LocationManager, LocationSink};

// Infrastructure
pub use infrastructure::config::{ManagerSettings, SimulationSettings};
pub use infrastructure::metrics::describe_metrics;
pub use infrastructure::simulated::{GazetteerGeocoder, SimulatedLocationService};
