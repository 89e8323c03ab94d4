//! Configuration Module
//!
//! Configuration loading for the location manager and simulated platform.

mod settings;

pub use crate::domain::config::ConfigError;
pub use settings::{ManagerSettings, SimulationSettings};
