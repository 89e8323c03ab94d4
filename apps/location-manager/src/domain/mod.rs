//! Domain Layer - Location request types and session logic.
//!
//! This layer contains the value types exchanged with the platform
//! location service and the pure session state machine. Nothing here
//! performs I/O or takes locks.

/// Caller configuration and request snapshots.
pub mod config;

/// Platform failure descriptors.
pub mod errors;

/// Raw location fixes.
pub mod location;

/// Reverse-geocoded placemarks and address formatting.
pub mod placemark;

/// Session tokens and the request state machine.
pub mod session;
