//! Application Services
//!
//! The location request facade and the sinks through which platform
//! collaborators report back to it.

mod delivery;
mod location_manager;

pub use delivery::{GeocodeSink, LocationSink};
pub use location_manager::LocationManager;
