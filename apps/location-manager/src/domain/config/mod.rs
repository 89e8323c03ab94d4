//! Request Configuration
//!
//! The knobs a caller sets before issuing a fetch: purpose text, distance
//! filter and desired accuracy. The facade snapshots these into a
//! [`LocationRequest`] when a session starts, so later edits only affect
//! the next session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Distance Filter
// =============================================================================

/// Minimum movement, in meters, before the platform delivers a new update.
///
/// Either unfiltered or a finite, non-negative distance. The only way to
/// build a filtered value is [`DistanceFilter::meters`], which validates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<f64>", into = "Option<f64>")]
pub struct DistanceFilter(Option<f64>);

impl DistanceFilter {
    /// Deliver every update regardless of movement.
    pub const NONE: Self = Self(None);

    /// Create a distance filter in meters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDistanceFilter` if `meters` is negative
    /// or not finite.
    pub fn meters(meters: f64) -> Result<Self, ConfigError> {
        if !meters.is_finite() || meters < 0.0 {
            return Err(ConfigError::InvalidDistanceFilter(meters));
        }
        Ok(Self(Some(meters)))
    }

    /// The filter as meters, `None` meaning unfiltered.
    #[must_use]
    pub const fn as_meters(&self) -> Option<f64> {
        self.0
    }
}

impl TryFrom<Option<f64>> for DistanceFilter {
    type Error = ConfigError;

    fn try_from(value: Option<f64>) -> Result<Self, Self::Error> {
        value.map_or(Ok(Self::NONE), Self::meters)
    }
}

impl From<DistanceFilter> for Option<f64> {
    fn from(filter: DistanceFilter) -> Self {
        filter.0
    }
}

// =============================================================================
// Desired Accuracy
// =============================================================================

/// Requested precision tier for location fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DesiredAccuracy {
    /// Highest precision plus additional sensor data, for navigation.
    BestForNavigation,
    /// Highest precision available.
    #[default]
    Best,
    /// Within ten meters.
    NearestTenMeters,
    /// Within one hundred meters.
    HundredMeters,
    /// Within one kilometer.
    Kilometer,
    /// Within three kilometers.
    ThreeKilometers,
}

impl DesiredAccuracy {
    /// Get all accuracy tiers, most precise first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BestForNavigation,
            Self::Best,
            Self::NearestTenMeters,
            Self::HundredMeters,
            Self::Kilometer,
            Self::ThreeKilometers,
        ]
    }

    /// Accuracy in meters as understood by platform services.
    ///
    /// The two "best" tiers use the platform's negative sentinel values.
    #[must_use]
    pub const fn as_meters(&self) -> f64 {
        match self {
            Self::BestForNavigation => -2.0,
            Self::Best => -1.0,
            Self::NearestTenMeters => 10.0,
            Self::HundredMeters => 100.0,
            Self::Kilometer => 1_000.0,
            Self::ThreeKilometers => 3_000.0,
        }
    }

    /// Get the tier name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BestForNavigation => "best_for_navigation",
            Self::Best => "best",
            Self::NearestTenMeters => "nearest_ten_meters",
            Self::HundredMeters => "hundred_meters",
            Self::Kilometer => "kilometer",
            Self::ThreeKilometers => "three_kilometers",
        }
    }
}

impl FromStr for DesiredAccuracy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| ConfigError::InvalidAccuracy(s.to_string()))
    }
}

impl std::fmt::Display for DesiredAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Location Config
// =============================================================================

/// Caller-supplied configuration for location requests.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Text shown to the end user explaining why location is requested.
    pub purpose: Option<String>,
    /// Minimum movement before a new update is delivered.
    pub distance_filter: DistanceFilter,
    /// Requested precision tier.
    pub desired_accuracy: DesiredAccuracy,
}

impl LocationConfig {
    /// Snapshot this configuration into a platform request.
    #[must_use]
    pub fn to_request(&self) -> LocationRequest {
        LocationRequest {
            purpose: self.purpose.clone(),
            distance_filter: self.distance_filter,
            desired_accuracy: self.desired_accuracy,
        }
    }
}

/// Immutable configuration snapshot handed to the platform for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    /// Purpose text.
    pub purpose: Option<String>,
    /// Distance filter.
    pub distance_filter: DistanceFilter,
    /// Desired accuracy.
    pub desired_accuracy: DesiredAccuracy,
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Distance filter is negative or not finite.
    #[error("invalid distance filter: {0} (must be a finite, non-negative number of meters)")]
    InvalidDistanceFilter(f64),
    /// Unknown accuracy tier name.
    #[error("unknown desired accuracy: {0}")]
    InvalidAccuracy(String),
    /// Coordinate component out of range.
    #[error("invalid {name}: {value}")]
    InvalidCoordinate {
        /// Which component was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
