use geo::{Bearing, Destination, Distance, Haversine};
use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::editing::find_vertex_insertion_index;
use crate::geometry::offset::create_default_polygon_path;
use crate::geometry::projection::{mercator_to_wgs84, wgs84_to_mercator};
use crate::geometry::Bounds;

/// How a ring is carried along when its center moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveMode {
    /// Shift every vertex by the same offset in Web Mercator space
    #[default]
    Planar,
    /// Keep each vertex's bearing and great-circle distance from the center
    Geodesic,
}

/// Ordered polygon boundary.
///
/// A stored ring is conventionally closed (first == last), but rings with
/// fewer points exist transiently while a polygon is being edited, so the
/// type itself does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<Coordinate>);

impl Ring {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    /// Closed square of half-width `radius_m` centered on `center`.
    ///
    /// Same corners as [`create_default_polygon_path`], with the first corner
    /// repeated so the result is a valid stored polygon.
    pub fn default_square(center: Coordinate, radius_m: f64) -> Self {
        Self::new(create_default_polygon_path(center.lat, center.lng, radius_m).to_vec()).closed()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.0.get(index).copied()
    }

    /// First and last points are identical on a ring of more than two points
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) if self.0.len() > 2 => first == last,
            _ => false,
        }
    }

    /// Copy of the ring with the first point appended when it is not already last
    pub fn closed(mut self) -> Self {
        if let (Some(&first), Some(&last)) = (self.0.first(), self.0.last())
            && self.0.len() > 1
            && first != last
        {
            self.0.push(first);
        }
        self
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.0)
    }

    /// Splice `point` into the edge nearest to it.
    ///
    /// Returns the index the point was inserted at. A closed ring stays
    /// closed: the closing vertex is left out of the search, and a point that
    /// belongs on the last edge goes in just before it.
    pub fn insert_near(&mut self, point: Coordinate) -> usize {
        let index = if self.is_closed() {
            let open = &self.0[..self.0.len() - 1];
            match find_vertex_insertion_index(point, open) {
                Some(0) | None => open.len(),
                Some(index) => index,
            }
        } else {
            find_vertex_insertion_index(point, &self.0).unwrap_or(0)
        };
        self.0.insert(index, point);
        index
    }

    /// Remove a vertex unless that would leave fewer than three points
    ///
    /// On a closed ring the first and last index are the same corner and the
    /// floor counts distinct corners; removing that corner re-closes the ring
    /// on the next one.
    pub fn remove_vertex(&mut self, index: usize) -> Option<Coordinate> {
        let len = self.0.len();
        if index >= len {
            return None;
        }

        if !self.is_closed() {
            return (len > 3).then(|| self.0.remove(index));
        }

        if len - 1 <= 3 {
            return None;
        }

        if index == 0 || index == len - 1 {
            self.0.pop();
            let removed = self.0.remove(0);
            let first = self.0[0];
            self.0.push(first);
            Some(removed)
        } else {
            Some(self.0.remove(index))
        }
    }

    /// Replace a vertex. Moving either end of a closed ring moves both.
    pub fn set_vertex(&mut self, index: usize, point: Coordinate) -> bool {
        let len = self.0.len();
        if index >= len {
            return false;
        }

        if self.is_closed() && (index == 0 || index == len - 1) {
            self.0[0] = point;
            self.0[len - 1] = point;
        } else {
            self.0[index] = point;
        }
        true
    }

    /// Copy of the ring re-centered so its bounds center lands on `target`
    pub fn moved_to(&self, target: Coordinate, mode: MoveMode) -> Self {
        let Some(bounds) = self.bounds() else {
            return self.clone();
        };
        let center = bounds.center();

        let points = match mode {
            MoveMode::Geodesic => {
                let origin = center.to_point();
                let destination = target.to_point();
                self.0
                    .iter()
                    .map(|vertex| {
                        let p = vertex.to_point();
                        let bearing = Haversine::bearing(origin, p);
                        let distance = Haversine::distance(origin, p);
                        Coordinate::from_point(Haversine::destination(
                            destination,
                            bearing,
                            distance,
                        ))
                    })
                    .collect()
            }
            MoveMode::Planar => {
                let from = wgs84_to_mercator(center.lat, center.lng);
                let to = wgs84_to_mercator(target.lat, target.lng);
                let dx = to.x() - from.x();
                let dy = to.y() - from.y();
                self.0
                    .iter()
                    .map(|vertex| {
                        let p = wgs84_to_mercator(vertex.lat, vertex.lng);
                        let (lat, lng) = mercator_to_wgs84(p.x() + dx, p.y() + dy);
                        Coordinate::new(lat, lng)
                    })
                    .collect()
            }
        };

        Self(points)
    }
}

impl From<Vec<Coordinate>> for Ring {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

impl AsRef<[Coordinate]> for Ring {
    fn as_ref(&self) -> &[Coordinate] {
        &self.0
    }
}
