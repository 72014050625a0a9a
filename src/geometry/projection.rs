//! Web Mercator (EPSG:3857) conversions
//!
//! Used to shift a polygon the way a flat map display would: every vertex
//! moves by the same amount in projected meters.

use geo::Point;

/// Half the projected width of the world in meters
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;

/// Latitudes beyond this cannot be represented
pub const MAX_LATITUDE: f64 = 85.05112878;

const LON_TO_X: f64 = EARTH_MERCATOR_MAX / 180.0;
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Convert WGS84 (lat, lng) to projected (x, y) meters, clamping latitude
pub fn wgs84_to_mercator(lat: f64, lng: f64) -> Point<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let lat_rad = lat.to_radians();

    let x = lng * LON_TO_X;
    let y = (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() * Y_FACTOR;

    Point::new(x, y)
}

/// Convert projected (x, y) meters back to (lat, lng)
pub fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lng = x / LON_TO_X;
    let lat = (std::f64::consts::FRAC_PI_2 - 2.0 * (-y / Y_FACTOR).exp().atan()).to_degrees();
    (lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let p = wgs84_to_mercator(0.0, 0.0);
        assert!(p.x().abs() < 1e-6);
        assert!(p.y().abs() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        for &(lat, lng) in &[(37.7749, -122.4194), (-33.8688, 151.2093), (0.0, 180.0)] {
            let p = wgs84_to_mercator(lat, lng);
            let (lat2, lng2) = mercator_to_wgs84(p.x(), p.y());
            assert!((lat - lat2).abs() < 1e-9);
            assert!((lng - lng2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamps_poles() {
        let p = wgs84_to_mercator(90.0, 0.0);
        assert!(p.y().is_finite());
        let (lat, _) = mercator_to_wgs84(p.x(), p.y());
        assert!((lat - MAX_LATITUDE).abs() < 1e-6);
    }
}
