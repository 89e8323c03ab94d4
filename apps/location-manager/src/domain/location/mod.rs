//! Location Fix Types
//!
//! Value types for the raw fixes produced by the platform location service.
//! The facade passes these through untouched; nothing here interprets the
//! fields beyond construction helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Coordinate
// =============================================================================

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

// =============================================================================
// Location
// =============================================================================

/// A single fix reported by the platform location service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Position of the fix.
    pub coordinate: Coordinate,
    /// Altitude above sea level in meters.
    pub altitude: f64,
    /// Radius of uncertainty for the coordinate, in meters.
    pub horizontal_accuracy: f64,
    /// Uncertainty of the altitude, in meters. Negative means invalid.
    pub vertical_accuracy: f64,
    /// Direction of travel in degrees from true north, if known.
    pub course: Option<f64>,
    /// Instantaneous speed in meters per second, if known.
    pub speed: Option<f64>,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl Location {
    /// Create a fix at `coordinate` taken now.
    ///
    /// Altitude defaults to zero with an invalid vertical accuracy.
    #[must_use]
    pub fn new(coordinate: Coordinate, horizontal_accuracy: f64) -> Self {
        Self {
            coordinate,
            altitude: 0.0,
            horizontal_accuracy,
            vertical_accuracy: -1.0,
            course: None,
            speed: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the altitude and its accuracy.
    #[must_use]
    pub const fn with_altitude(mut self, altitude: f64, vertical_accuracy: f64) -> Self {
        self.altitude = altitude;
        self.vertical_accuracy = vertical_accuracy;
        self
    }

    /// Set course and speed.
    #[must_use]
    pub const fn with_motion(mut self, course: f64, speed: f64) -> Self {
        self.course = Some(course);
        self.speed = Some(speed);
        self
    }

    /// Override the fix timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Latitude of the fix.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    /// Longitude of the fix.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_validity() {
        assert!(Coordinate::new(52.37, 4.89).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn coordinate_display() {
        let coord = Coordinate::new(52.370_216, 4.895_168);
        assert_eq!(coord.to_string(), "52.370216,4.895168");
    }

    #[test]
    fn location_builders() {
        let location = Location::new(Coordinate::new(1.0, 2.0), 5.0)
            .with_altitude(12.0, 3.0)
            .with_motion(90.0, 1.5);

        assert!((location.latitude() - 1.0).abs() < f64::EPSILON);
        assert!((location.longitude() - 2.0).abs() < f64::EPSILON);
        assert!((location.altitude - 12.0).abs() < f64::EPSILON);
        assert_eq!(location.course, Some(90.0));
        assert_eq!(location.speed, Some(1.5));
    }

    #[test]
    fn location_serializes_to_json() {
        let location = Location::new(Coordinate::new(1.0, 2.0), 5.0);
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["coordinate"]["latitude"], 1.0);
        assert_eq!(json["horizontal_accuracy"], 5.0);
        assert!(json["course"].is_null());
    }
}
