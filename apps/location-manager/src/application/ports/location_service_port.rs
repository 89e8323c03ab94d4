//! Location Service Port (Driven Port)
//!
//! Interface to the platform service that produces raw location fixes.

use crate::application::services::LocationSink;
use crate::domain::config::LocationRequest;

/// Port for the platform location service.
///
/// Implementations report fixes and failures through the [`LocationSink`]
/// they were handed, from whatever execution context the platform uses.
/// They may deliver more than once (streaming updates) and may deliver
/// synchronously from inside `start_updating`. They must not block inside
/// these calls waiting for a delivery made on another thread, since the
/// manager holds its delivery gate across them.
#[cfg_attr(test, mockall::automock)]
pub trait LocationServicePort: Send + Sync {
    /// Start delivering location updates for `request`.
    fn start_updating(&self, request: LocationRequest, sink: LocationSink);

    /// Stop delivering location updates. Must be safe to call when idle.
    fn stop_updating(&self);
}
