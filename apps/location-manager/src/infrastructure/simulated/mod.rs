//! Simulated Platform Adapters
//!
//! In-process implementations of the platform ports, driven by tokio
//! timers and cancellable through `CancellationToken`.

mod geocoder;
mod location_service;

pub use geocoder::GazetteerGeocoder;
pub use location_service::SimulatedLocationService;
