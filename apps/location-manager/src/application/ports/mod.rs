//! Port Interfaces
//!
//! Defines the interfaces (ports) for external collaborators following
//! the Hexagonal Architecture pattern.
//!
//! ## Driven Ports (Outbound)
//!
//! - `LocationServicePort`: start/stop location updates on the platform
//! - `GeocoderPort`: reverse geocode a fix into placemarks
//! - `LocationManagerDelegate`: optional callbacks implemented by the caller

mod delegate_port;
mod geocoder_port;
mod location_service_port;

pub use delegate_port::LocationManagerDelegate;
pub use geocoder_port::GeocoderPort;
pub use location_service_port::LocationServicePort;

#[cfg(test)]
pub use geocoder_port::MockGeocoderPort;
#[cfg(test)]
pub use location_service_port::MockLocationServicePort;
