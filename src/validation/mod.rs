//! Input validation for coordinates, radii and polygon rings
//!
//! Latitude and longitude are checked as text: an optional sign, an integer
//! part within range and at most 18 decimals. Numbers are validated through
//! their `Display` form, which never uses exponent notation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Display;

use crate::domain::Coordinate;

/// Maximum number of decimals accepted in a latitude or longitude
pub const MAX_DECIMALS: usize = 18;

static LATITUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[1-8]?\d(?:\.\d{1,18})?|90(?:\.0{1,18})?)$").expect("Invalid latitude regex")
});

static LONGITUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:(?:1[0-7]|[1-9])?\d(?:\.\d{1,18})?|180(?:\.0{1,18})?)$")
        .expect("Invalid longitude regex")
});

/// Latitude in [-90, 90]
pub fn is_valid_latitude(lat: impl Display) -> bool {
    LATITUDE_RE.is_match(&lat.to_string())
}

/// Longitude in [-180, 180]
pub fn is_valid_longitude(lng: impl Display) -> bool {
    LONGITUDE_RE.is_match(&lng.to_string())
}

pub fn is_valid_coordinate(lat: impl Display, lng: impl Display) -> bool {
    is_valid_latitude(lat) && is_valid_longitude(lng)
}

/// Parse a radius, accepting only finite non-negative numbers
pub fn parse_radius(radius: &str) -> Option<f64> {
    radius
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0)
}

pub fn is_valid_radius(radius: &str) -> bool {
    parse_radius(radius).is_some()
}

/// A storable polygon: more than two in-range points, closed (first == last).
///
/// Unlike [`is_valid_coordinate`], points are checked numerically with
/// [`Coordinate::is_in_range`], so the 18-decimal limit of the text
/// validators does not apply. Rings computed near the equator or the prime
/// meridian carry longer decimals and still count as valid.
pub fn is_valid_polygon_path(path: &[Coordinate]) -> bool {
    if !path.iter().all(Coordinate::is_in_range) {
        return false;
    }

    match (path.first(), path.last()) {
        (Some(first), Some(last)) if path.len() > 2 => first == last,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_accepts() {
        for lat in ["0", "-0", "1", "45.5", "-45.123456", "89.999999999999999999", "90", "90.0", "-90.000"] {
            assert!(is_valid_latitude(lat), "{lat} should be valid");
        }
    }

    #[test]
    fn test_latitude_rejects() {
        for lat in [
            "91",
            "90.0000000000000001",
            "90.5",
            "100",
            "12.3.4",
            "abc",
            "",
            "1.",
            ".5",
            "+1",
            " 1",
            "1.1234567890123456789",
        ] {
            assert!(!is_valid_latitude(lat), "{lat:?} should be invalid");
        }
    }

    #[test]
    fn test_longitude() {
        for lng in ["0", "-122.4194", "179.9", "180", "-180.0", "99"] {
            assert!(is_valid_longitude(lng), "{lng} should be valid");
        }
        for lng in ["181", "180.1", "200", "-1800", "1e5", "abc"] {
            assert!(!is_valid_longitude(lng), "{lng} should be invalid");
        }
    }

    #[test]
    fn test_coordinate_from_numbers() {
        assert!(is_valid_coordinate(37.7749, -122.4194));
        assert!(is_valid_coordinate(0.1 + 0.2, 1.0));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::NAN));
    }

    #[test]
    fn test_radius() {
        assert!(is_valid_radius("0"));
        assert!(is_valid_radius("12.5"));
        assert!(is_valid_radius(" 3 "));
        assert!(!is_valid_radius("-1"));
        assert!(!is_valid_radius("abc"));
        assert!(!is_valid_radius(""));
        assert!(!is_valid_radius("NaN"));
        assert!(!is_valid_radius("inf"));
    }

    #[test]
    fn test_polygon_path_too_short() {
        let path = [Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)];
        assert!(!is_valid_polygon_path(&path));

        let path = [Coordinate::new(1.0, 1.0), Coordinate::new(1.0, 1.0)];
        assert!(!is_valid_polygon_path(&path));
        assert!(!is_valid_polygon_path(&[]));
    }

    #[test]
    fn test_polygon_path_must_be_closed() {
        let open = [
            Coordinate::new(1.0, 2.0),
            Coordinate::new(3.0, 4.0),
            Coordinate::new(5.0, 6.0),
        ];
        assert!(!is_valid_polygon_path(&open));

        let closed = [open[0], open[1], open[2], open[0]];
        assert!(is_valid_polygon_path(&closed));
    }

    #[test]
    fn test_polygon_path_rejects_invalid_point() {
        let path = [
            Coordinate::new(1.0, 2.0),
            Coordinate::new(95.0, 4.0),
            Coordinate::new(1.0, 2.0),
        ];
        assert!(!is_valid_polygon_path(&path));
    }

    #[test]
    fn test_polygon_path_near_origin() {
        // Shortest Display of these offsets has more than 18 decimals
        let d = 10.0 / 111320.0;
        let path = [
            Coordinate::new(d, -d),
            Coordinate::new(d, d),
            Coordinate::new(-d, d),
            Coordinate::new(d, -d),
        ];
        assert!(!is_valid_latitude(d));
        assert!(is_valid_polygon_path(&path));
    }
}
