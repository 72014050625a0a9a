//! Single-ring polygon WKT codec
//!
//! Rings are written as `(lng lat,lng lat,...)`. Parsing is lenient: a
//! `POLYGON` keyword, extra whitespace and lowercase input are accepted, and a
//! vertex that fails validation is dropped instead of failing the whole ring.
//! Multi-ring polygons and holes are not supported.

use crate::domain::Coordinate;
use crate::validation::{MAX_DECIMALS, is_valid_coordinate};

const POLYGON_KEYWORD: &str = "POLYGON";

/// Shortest decimal form, cut to the decimals the validators accept
fn format_ordinate(value: f64) -> String {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, decimals)) if decimals.len() > MAX_DECIMALS => {
            let rounded = format!("{:.*}", MAX_DECIMALS, value);
            let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
            if trimmed == "-0" {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        }
        _ => text,
    }
}

fn format_vertex(c: &Coordinate) -> String {
    format!("{} {}", format_ordinate(c.lng), format_ordinate(c.lat))
}

/// Serialize a ring, closing it if the last point differs from the first
pub fn path_to_wkt(path: &[Coordinate]) -> String {
    let mut points: Vec<String> = path.iter().map(format_vertex).collect();

    if let (Some(first), Some(last)) = (path.first(), path.last())
        && path.len() > 1
        && first != last
    {
        points.push(format_vertex(first));
    }

    format!("({})", points.join(","))
}

/// [`path_to_wkt`] wrapped in a `POLYGON(...)` keyword
pub fn polygon_wkt(path: &[Coordinate]) -> String {
    format!("{}({})", POLYGON_KEYWORD, path_to_wkt(path))
}

/// Collapse whitespace, upper-case, and strip a leading `POLYGON` keyword
/// together with one pair of parentheses.
pub fn normalize_polygon_wkt(wkt: &str) -> String {
    let wkt = wkt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    if !wkt.starts_with(POLYGON_KEYWORD) {
        return wkt;
    }

    wkt.replacen(POLYGON_KEYWORD, "", 1)
        .trim()
        .replacen('(', "", 1)
        .replacen(')', "", 1)
        .trim()
        .to_string()
}

/// Parse WKT text into a ring, keeping only the valid vertices
pub fn polygon_wkt_to_array(wkt: &str) -> Vec<Coordinate> {
    let normalized = normalize_polygon_wkt(wkt);
    let body = normalized.replacen('(', "", 1).replacen(')', "", 1);

    body.trim()
        .split(',')
        .filter_map(|entry| {
            let mut tokens = entry.trim().split(' ');
            let lng = tokens.next().unwrap_or_default();
            let lat = tokens.next().unwrap_or_default();

            if !is_valid_coordinate(lat, lng) {
                tracing::debug!(vertex = entry.trim(), "dropping invalid WKT vertex");
                return None;
            }

            Some(Coordinate::new(lat.parse().ok()?, lng.parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Coordinate> {
        vec![
            Coordinate::new(1.0, 2.0),
            Coordinate::new(3.0, 4.0),
            Coordinate::new(5.0, 6.0),
        ]
    }

    #[test]
    fn test_path_to_wkt_closes_ring() {
        assert_eq!(path_to_wkt(&triangle()), "(2 1,4 3,6 5,2 1)");
    }

    #[test]
    fn test_path_to_wkt_already_closed() {
        let mut ring = triangle();
        ring.push(ring[0]);
        assert_eq!(path_to_wkt(&ring), "(2 1,4 3,6 5,2 1)");
    }

    #[test]
    fn test_path_to_wkt_small_rings() {
        assert_eq!(path_to_wkt(&[]), "()");
        assert_eq!(path_to_wkt(&[Coordinate::new(1.0, 2.0)]), "(2 1)");
        assert_eq!(
            path_to_wkt(&[Coordinate::new(1.0, 2.0), Coordinate::new(3.5, -4.25)]),
            "(2 1,-4.25 3.5,2 1)"
        );
    }

    #[test]
    fn test_tiny_ordinates_stay_readable() {
        let d = 10.0 / 111320.0;
        let ring = vec![
            Coordinate::new(d, -d),
            Coordinate::new(d, d),
            Coordinate::new(-d, d),
            Coordinate::new(1e-20, 0.0),
        ];
        let wkt = path_to_wkt(&ring);
        assert!(wkt.contains("-0.000089831117499102"), "{wkt}");
        assert!(wkt.contains("0 0,"), "{wkt}");

        let parsed = polygon_wkt_to_array(&wkt);
        assert_eq!(parsed.len(), 5);
        assert!((parsed[0].lat - d).abs() < 1e-17);
    }

    #[test]
    fn test_polygon_wkt_keyword() {
        assert_eq!(polygon_wkt(&triangle()), "POLYGON((2 1,4 3,6 5,2 1))");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_polygon_wkt("  polygon   ((2 1,  4 3))  "),
            "(2 1, 4 3)"
        );
        assert_eq!(normalize_polygon_wkt("POLYGON(2 1,4 3)"), "2 1,4 3");
        assert_eq!(normalize_polygon_wkt("(2\t1,\n4 3)"), "(2 1, 4 3)");
    }

    #[test]
    fn test_parse_polygon_keyword() {
        let ring = polygon_wkt_to_array("POLYGON((2 1, 4 3, 6 5, 2 1))");
        assert_eq!(
            ring,
            vec![
                Coordinate::new(1.0, 2.0),
                Coordinate::new(3.0, 4.0),
                Coordinate::new(5.0, 6.0),
                Coordinate::new(1.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_parse_drops_invalid_vertices() {
        let ring = polygon_wkt_to_array("(2 1, 4 95, abc, 6 5, 7, 2 1)");
        assert_eq!(
            ring,
            vec![
                Coordinate::new(1.0, 2.0),
                Coordinate::new(5.0, 6.0),
                Coordinate::new(1.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_parse_ignores_extra_ordinates() {
        let ring = polygon_wkt_to_array("(2 1 100, 4 3 100)");
        assert_eq!(ring, vec![Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(polygon_wkt_to_array("").is_empty());
        assert!(polygon_wkt_to_array("POLYGON EMPTY").is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut ring = vec![
            Coordinate::new(37.7749, -122.4194),
            Coordinate::new(37.7849, -122.4094),
            Coordinate::new(37.7649, -122.3994),
            Coordinate::new(-0.000001, 179.999999999),
        ];
        ring.push(ring[0]);

        assert_eq!(polygon_wkt_to_array(&path_to_wkt(&ring)), ring);
        assert_eq!(polygon_wkt_to_array(&polygon_wkt(&ring)), ring);
    }
}
