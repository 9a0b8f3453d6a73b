//! Geographic point values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// A geographical point with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoPoint {
    /// Create a new geographical point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FieldError::invalid_argument(format!(
                "Invalid latitude: {latitude} (must be between -90 and 90)"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FieldError::invalid_argument(format!(
                "Invalid longitude: {longitude} (must be between -180 and 180)"
            )));
        }

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

// Agrees with the derived `PartialEq`, so `-0.0` and `0.0` compare equal.
impl PartialOrd for GeoPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.latitude.partial_cmp(&other.latitude)? {
            Ordering::Equal => self.longitude.partial_cmp(&other.longitude),
            ordering => Some(ordering),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_creation() {
        let point = GeoPoint::new(40.7128, -74.0060).unwrap();
        assert_eq!(point.latitude(), 40.7128);
        assert_eq!(point.longitude(), -74.0060);

        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_ordering() {
        let south = GeoPoint::new(-10.0, 50.0).unwrap();
        let north_west = GeoPoint::new(10.0, -50.0).unwrap();
        let north_east = GeoPoint::new(10.0, 50.0).unwrap();
        assert!(south < north_west);
        assert!(north_west < north_east);
    }

    #[test]
    fn test_signed_zero_ordering_matches_equality() {
        let negative = GeoPoint::new(-0.0, -0.0).unwrap();
        let positive = GeoPoint::new(0.0, 0.0).unwrap();
        assert_eq!(negative, positive);
        assert_eq!(negative.partial_cmp(&positive), Some(Ordering::Equal));
        assert!(negative <= positive && negative >= positive);
    }
}
