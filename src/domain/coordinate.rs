use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{is_valid_latitude, is_valid_longitude};

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Rejected text at the input edge
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("invalid latitude: {0:?}")]
    InvalidLatitude(String),
    #[error("invalid longitude: {0:?}")]
    InvalidLongitude(String),
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse a latitude/longitude pair of input texts.
    ///
    /// Both values go through the same format checks as
    /// [`is_valid_latitude`] and [`is_valid_longitude`], so anything accepted
    /// here is within [-90, 90] x [-180, 180].
    pub fn parse(lat: &str, lng: &str) -> Result<Self, CoordinateError> {
        let lat = lat.trim();
        let lng = lng.trim();

        if !is_valid_latitude(lat) {
            return Err(CoordinateError::InvalidLatitude(lat.to_string()));
        }
        if !is_valid_longitude(lng) {
            return Err(CoordinateError::InvalidLongitude(lng.to_string()));
        }

        // The patterns only admit plain decimals, which always parse
        let lat = lat
            .parse()
            .map_err(|_| CoordinateError::InvalidLatitude(lat.to_string()))?;
        let lng = lng
            .parse()
            .map_err(|_| CoordinateError::InvalidLongitude(lng.to_string()))?;

        Ok(Self { lat, lng })
    }

    /// Format as `lat, lng` with a fixed number of decimals
    pub fn to_fixed(&self, decimals: usize) -> (String, String) {
        (
            format!("{:.*}", decimals, self.lat),
            format!("{:.*}", decimals, self.lng),
        )
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub(crate) fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lng, self.lat)
    }

    pub(crate) fn from_point(point: geo::Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lng: point.x(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}
