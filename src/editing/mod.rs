//! Vertex search for interactive polygon editing
//!
//! When the user clicks near a polygon, the new vertex goes into the edge the
//! click projects onto. A point projects onto segment AB when the angles it
//! forms at A and at B are both at most 90 degrees.
//! See <https://math.stackexchange.com/questions/3485915>.

use crate::domain::Coordinate;
use crate::geometry::{angle_between_three_points, calculate_distance};

/// Index of the vertex nearest to `point`, lowest index on ties
pub fn find_closest_vertex(point: Coordinate, path: &[Coordinate]) -> Option<usize> {
    match path.len() {
        0 => None,
        1 => Some(0),
        _ => {
            let mut closest_index = 0;
            let mut closest_distance = f64::INFINITY;

            for (index, vertex) in path.iter().enumerate() {
                let distance = calculate_distance(point, *vertex);
                if distance < closest_distance {
                    closest_distance = distance;
                    closest_index = index;
                }
            }

            Some(closest_index)
        }
    }
}

/// Index at which `point` should be inserted into `path`.
///
/// The new vertex lands either just before the closest vertex (on the edge
/// from its predecessor) or just after it (on the edge to its successor).
pub fn find_vertex_insertion_index(point: Coordinate, path: &[Coordinate]) -> Option<usize> {
    let closest_index = find_closest_vertex(point, path)?;
    let len = path.len();

    if len < 2 {
        return Some(closest_index);
    }

    let next_index = (closest_index + 1) % len;
    let prev_index = if closest_index > 0 {
        closest_index - 1
    } else {
        len - 1
    };

    let closest = path[closest_index];
    let next = path[next_index];
    let prev = path[prev_index];

    let point_closest_prev = angle_between_three_points(point, closest, prev);
    let point_prev_closest = angle_between_three_points(point, prev, closest);
    let point_closest_next = angle_between_three_points(point, closest, next);
    let point_next_closest = angle_between_three_points(point, next, closest);

    // Only the next side is checked for also being obtuse
    let beyond_prev_edge = point_prev_closest > 90.0
        || (point_closest_prev > 90.0
            && !(point_closest_next > 90.0 || point_next_closest > 90.0));

    if beyond_prev_edge {
        Some(next_index)
    } else {
        Some(closest_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed square ~1.1 km wide around the origin:
    /// 0 = (0.01, -0.01) top-left, 1 = top-right, 2 = bottom-right, 3 = bottom-left
    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.01, -0.01),
            Coordinate::new(0.01, 0.01),
            Coordinate::new(-0.01, 0.01),
            Coordinate::new(-0.01, -0.01),
        ]
    }

    #[test]
    fn test_closest_vertex_empty_and_single() {
        let p = Coordinate::new(0.0, 0.0);
        assert_eq!(find_closest_vertex(p, &[]), None);
        assert_eq!(find_closest_vertex(p, &[Coordinate::new(50.0, 50.0)]), Some(0));
    }

    #[test]
    fn test_closest_vertex() {
        let path = square();
        assert_eq!(find_closest_vertex(Coordinate::new(0.009, 0.008), &path), Some(1));
        assert_eq!(find_closest_vertex(Coordinate::new(-0.02, -0.02), &path), Some(3));
    }

    #[test]
    fn test_closest_vertex_tie_keeps_first() {
        // The origin is equidistant from all four corners
        assert_eq!(find_closest_vertex(Coordinate::new(0.0, 0.0), &square()), Some(0));

        let a = Coordinate::new(1.0, 1.0);
        assert_eq!(find_closest_vertex(a, &[Coordinate::new(0.0, 0.0), a, a]), Some(1));
    }

    #[test]
    fn test_insertion_empty_and_single() {
        let p = Coordinate::new(0.0, 0.0);
        assert_eq!(find_vertex_insertion_index(p, &[]), None);
        assert_eq!(find_vertex_insertion_index(p, &[Coordinate::new(1.0, 1.0)]), Some(0));
    }

    #[test]
    fn test_insertion_on_next_edge() {
        // Above the top edge, nearer the top-left corner: between 0 and 1
        let click = Coordinate::new(0.011, -0.006);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(1));
    }

    #[test]
    fn test_insertion_on_prev_edge() {
        // Left of the left edge, nearer the top-left corner: between 3 and 0
        let click = Coordinate::new(0.006, -0.011);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(0));
    }

    #[test]
    fn test_insertion_on_right_edge() {
        // Right of the right edge near the bottom: between 1 and 2
        let click = Coordinate::new(-0.005, 0.012);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(2));
    }

    #[test]
    fn test_insertion_wraps_to_start() {
        // Below the bottom edge near the bottom-left corner: between 2 and 3
        let click = Coordinate::new(-0.011, -0.006);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(3));

        // Left of the left edge near the bottom-left corner: between 3 and 0,
        // which is the end of the ring
        let click = Coordinate::new(-0.006, -0.011);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(0));
    }

    #[test]
    fn test_insertion_beyond_corner_keeps_closest() {
        // Diagonally outside the top-left corner the click is obtuse to both
        // adjacent edges, so it goes in before the corner itself
        let click = Coordinate::new(0.012, -0.012);
        assert_eq!(find_vertex_insertion_index(click, &square()), Some(0));
    }

    #[test]
    fn test_insertion_two_points() {
        let path = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.01)];
        let click = Coordinate::new(0.001, 0.004);
        assert_eq!(find_vertex_insertion_index(click, &path), Some(0));
    }
}
