//! Manager Settings
//!
//! Configuration for the location manager and the simulated platform,
//! loaded from environment variables.

use std::time::Duration;

use crate::domain::config::{ConfigError, DesiredAccuracy, DistanceFilter, LocationConfig};
use crate::domain::location::Coordinate;

/// Settings for the simulated platform adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Where the simulated fix is reported.
    pub coordinate: Coordinate,
    /// Reported horizontal accuracy of the fix, in meters.
    pub horizontal_accuracy: f64,
    /// Delay before the fix is delivered.
    pub delay: Duration,
    /// Maximum distance the gazetteer searches for a placemark, in meters.
    pub search_radius_m: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            // Dam Square, Amsterdam.
            coordinate: Coordinate::new(52.373_08, 4.892_53),
            horizontal_accuracy: 10.0,
            delay: Duration::from_millis(250),
            search_radius_m: 5_000.0,
        }
    }
}

/// Complete manager configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManagerSettings {
    /// Request configuration applied to the manager.
    pub location: LocationConfig,
    /// Simulated platform settings.
    pub simulation: SimulationSettings,
}

impl ManagerSettings {
    /// Create configuration from environment variables.
    ///
    /// Unparseable numbers fall back to defaults; values that parse but are
    /// out of range are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown accuracy tier, a negative distance
    /// filter, or an out-of-range simulated coordinate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ManagerSettings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let purpose = lookup("LOCATION_PURPOSE").filter(|p| !p.trim().is_empty());

        let distance_filter = match parse_f64(&lookup, "LOCATION_DISTANCE_FILTER_M") {
            Some(meters) => DistanceFilter::meters(meters)?,
            None => DistanceFilter::NONE,
        };

        let desired_accuracy = match lookup("LOCATION_DESIRED_ACCURACY") {
            Some(name) => name.parse::<DesiredAccuracy>()?,
            None => DesiredAccuracy::default(),
        };

        let defaults = SimulationSettings::default();

        let latitude =
            parse_f64(&lookup, "SIMULATED_LATITUDE").unwrap_or(defaults.coordinate.latitude);
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidCoordinate {
                name: "latitude",
                value: latitude,
            });
        }

        let longitude =
            parse_f64(&lookup, "SIMULATED_LONGITUDE").unwrap_or(defaults.coordinate.longitude);
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidCoordinate {
                name: "longitude",
                value: longitude,
            });
        }

        let simulation = SimulationSettings {
            coordinate: Coordinate::new(latitude, longitude),
            horizontal_accuracy: parse_f64(&lookup, "SIMULATED_ACCURACY_M")
                .filter(|m| *m >= 0.0)
                .unwrap_or(defaults.horizontal_accuracy),
            delay: lookup("SIMULATED_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map_or(defaults.delay, Duration::from_millis),
            search_radius_m: parse_f64(&lookup, "SIMULATED_SEARCH_RADIUS_M")
                .filter(|m| *m > 0.0)
                .unwrap_or(defaults.search_radius_m),
        };

        Ok(Self {
            location: LocationConfig {
                purpose,
                distance_filter,
                desired_accuracy,
            },
            simulation,
        })
    }
}

fn parse_f64<F>(lookup: &F, key: &str) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
