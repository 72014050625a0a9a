use serde::{Deserialize, Serialize};

use crate::config::ShapeStyle;
use crate::domain::{Coordinate, Ring};
use crate::geometry::Bounds;

/// Something the user did, reported by the map surface or the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WidgetEvent {
    CoordinateInputChanged { lat: String, lng: String },
    RadiusInputChanged { value: String },
    PolygonInputChanged { value: String },
    MarkerDragged { position: Coordinate },
    CircleMoved { center: Coordinate },
    CircleResized { radius_m: f64 },
    /// The whole polygon was dragged; `ring` is its new path
    PolygonDragged { ring: Ring },
    MapClicked { position: Coordinate },
    VertexRemoved { index: usize },
    VertexMoved { index: usize, position: Coordinate },
    /// A search result was picked
    PlaceSelected { position: Coordinate },
    ClearRequested,
}

/// Form fields bound to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Lat,
    Lng,
    Radius,
    Polygon,
}

/// A change for the map surface or the form to apply
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    ShowMap {
        center: Coordinate,
        zoom: u8,
        interactive: bool,
        map_id: String,
    },
    PlaceMarker {
        position: Coordinate,
        draggable: bool,
        animate: bool,
    },
    MoveMarker {
        position: Coordinate,
        pan: bool,
    },
    ShowCircle {
        center: Coordinate,
        radius_m: f64,
        style: ShapeStyle,
        editable: bool,
    },
    MoveCircle {
        center: Coordinate,
    },
    ResizeCircle {
        radius_m: f64,
    },
    ShowPolygon {
        ring: Ring,
        style: ShapeStyle,
        editable: bool,
    },
    SetPolygonPath {
        ring: Ring,
    },
    FitBounds {
        bounds: Bounds,
    },
    SetZoom {
        zoom: u8,
    },
    SetInput {
        field: InputField,
        value: String,
    },
    DisableInputs,
    /// Reverse-geocode `position` into the search box
    LookupAddress {
        position: Coordinate,
    },
}
