use crate::domain::Coordinate;

/// Meters per degree of latitude.
///
/// Varies between ~110.57 km at the equator and ~111.70 km at the poles;
/// 111.32 km matches what web map providers use.
pub const EARTH_COEFFICIENT: f64 = 111320.0;

/// Direction of a meter offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Add,
    Subtract,
}

impl Offset {
    /// `'-'` subtracts, anything else adds
    pub fn from_sign(sign: char) -> Self {
        if sign == '-' {
            Offset::Subtract
        } else {
            Offset::Add
        }
    }

    fn apply(self, value: f64, delta: f64) -> f64 {
        match self {
            Offset::Add => value + delta,
            Offset::Subtract => value - delta,
        }
    }
}

/// Move a latitude north (`Add`) or south by `meters`
pub fn calculate_latitude(lat: f64, _lng: f64, meters: f64, op: Offset) -> f64 {
    op.apply(lat, meters / EARTH_COEFFICIENT)
}

/// Move a longitude east (`Add`) or west by `meters` at latitude `lat`.
///
/// The degree delta scales with `1 / cos(lat)` and diverges at the poles.
pub fn calculate_longitude(lat: f64, lng: f64, meters: f64, op: Offset) -> f64 {
    let delta = (meters / EARTH_COEFFICIENT) / lat.to_radians().cos();
    op.apply(lng, delta)
}

/// Corners of a square of half-width `radius_m` around (lat, lng):
/// top-left, top-right, bottom-right, bottom-left.
///
/// The ring is open. See [`crate::domain::Ring::default_square`] for the
/// closed form.
pub fn create_default_polygon_path(lat: f64, lng: f64, radius_m: f64) -> [Coordinate; 4] {
    let north = calculate_latitude(lat, lng, radius_m, Offset::Add);
    let south = calculate_latitude(lat, lng, radius_m, Offset::Subtract);
    let east = calculate_longitude(lat, lng, radius_m, Offset::Add);
    let west = calculate_longitude(lat, lng, radius_m, Offset::Subtract);

    [
        Coordinate::new(north, west),
        Coordinate::new(north, east),
        Coordinate::new(south, east),
        Coordinate::new(south, west),
    ]
}
