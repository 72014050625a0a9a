//! Geometry on a spherical Earth model
//!
//! Angles are computed on the chord vectors between points projected onto a
//! sphere of radius [`EARTH_RADIUS_KM`]. At the scale of a hand-drawn fence
//! this is indistinguishable from the angle on the surface.

use crate::domain::Coordinate;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cartesian position or direction, in km
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

/// Project a lat/lng (degrees) onto the sphere
pub fn to_cartesian(lat: f64, lng: f64) -> Vector3 {
    let phi = lat.to_radians();
    let theta = lng.to_radians();

    Vector3 {
        x: EARTH_RADIUS_KM * phi.cos() * theta.cos(),
        y: EARTH_RADIUS_KM * phi.cos() * theta.sin(),
        z: EARTH_RADIUS_KM * phi.sin(),
    }
}

/// Vector from `a` to `b`
pub fn vector(a: &Vector3, b: &Vector3) -> Vector3 {
    Vector3 {
        x: b.x - a.x,
        y: b.y - a.y,
        z: b.z - a.z,
    }
}

/// Angle between two vectors in degrees, in [0, 180].
///
/// A zero-length vector has no direction; the angle is reported as 0 in that
/// case so coincident points never satisfy an "obtuse" test.
pub fn angle_between_vectors(v1: &Vector3, v2: &Vector3) -> f64 {
    let mag = v1.magnitude() * v2.magnitude();
    if mag == 0.0 {
        return 0.0;
    }

    let cos_theta = (v1.dot(v2) / mag).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Angle at `p2` formed by the rays towards `p1` and `p3`, in degrees
pub fn angle_between_three_points(p1: Coordinate, p2: Coordinate, p3: Coordinate) -> f64 {
    let a = to_cartesian(p1.lat, p1.lng);
    let b = to_cartesian(p2.lat, p2.lng);
    let c = to_cartesian(p3.lat, p3.lng);

    angle_between_vectors(&vector(&b, &a), &vector(&b, &c))
}

/// Great-circle distance in km (haversine)
pub fn calculate_distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
