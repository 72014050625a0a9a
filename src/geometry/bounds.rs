use serde::{Deserialize, Serialize};

use super::offset::{Offset, calculate_latitude, calculate_longitude};
use crate::domain::Coordinate;

/// Lat/lng bounding box in degrees.
///
/// Boxes that straddle the antimeridian are not represented; west is always
/// the numerically smaller longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Bounds of a single point
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    /// Create bounds from a set of points
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_point(*first);
        bounds.expand(rest);
        Some(bounds)
    }

    /// Box enclosing a circle of `radius_m` around `center`
    pub fn around_circle(center: Coordinate, radius_m: f64) -> Self {
        let (lat, lng) = (center.lat, center.lng);
        Self {
            south: calculate_latitude(lat, lng, radius_m, Offset::Subtract),
            west: calculate_longitude(lat, lng, radius_m, Offset::Subtract),
            north: calculate_latitude(lat, lng, radius_m, Offset::Add),
            east: calculate_longitude(lat, lng, radius_m, Offset::Add),
        }
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[Coordinate]) {
        for &point in points {
            self.extend(point);
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 20.0),
            Coordinate::new(5.0, -4.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.south, 0.0);
        assert_eq!(bounds.north, 10.0);
        assert_eq!(bounds.west, -4.0);
        assert_eq!(bounds.east, 20.0);
        assert_eq!(bounds.center(), Coordinate::new(5.0, 8.0));
    }

    #[test]
    fn test_bounds_from_no_points() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_union_and_contains() {
        let a = Bounds::from_point(Coordinate::new(1.0, 1.0));
        let b = Bounds::from_point(Coordinate::new(-1.0, 3.0));
        let u = a.union(&b);

        assert!(u.contains(Coordinate::new(0.0, 2.0)));
        assert!(!u.contains(Coordinate::new(2.0, 2.0)));
        assert_eq!(u.center(), Coordinate::new(0.0, 2.0));
    }

    #[test]
    fn test_around_circle() {
        let center = Coordinate::new(0.0, 0.0);
        let bounds = Bounds::around_circle(center, 111320.0);
        assert!((bounds.north - 1.0).abs() < 1e-12);
        assert!((bounds.west + 1.0).abs() < 1e-12);
        assert_eq!(bounds.center(), center);
    }
}
