//! Infrastructure Layer - Adapters and ambient concerns.
//!
//! This layer contains configuration loading, logging, metrics and the
//! simulated implementations of the platform ports.

/// Configuration loaded from the environment.
pub mod config;

/// Counters recorded through the `metrics` facade.
pub mod metrics;

/// Simulated location service and geocoder.
pub mod simulated;

/// Tracing subscriber setup.
pub mod telemetry;
