//! Application Layer - Facade and port definitions.
//!
//! This layer contains the location request facade and the port
//! interfaces that define how it talks to the platform location service,
//! the reverse geocoder and the caller's delegate.

/// Port interfaces for external collaborators (platform, geocoder, delegate).
pub mod ports;

/// The location request facade and its delivery sinks.
pub mod services;
