use serde::{Deserialize, Serialize};

use super::events::{InputField, SurfaceCommand, WidgetEvent};
use crate::config::WidgetConfig;
use crate::domain::{Coordinate, Ring};
use crate::geometry::Bounds;
use crate::validation::{
    is_valid_latitude, is_valid_longitude, is_valid_polygon_path, parse_radius,
};
use crate::wkt::{path_to_wkt, polygon_wkt_to_array};

const COORDINATE_DECIMALS: usize = 6;
const PLACE_ZOOM: u8 = 16;

/// Text of the form fields bound to the widget. `None` means the form has
/// no such field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInputs {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub polygon: Option<String>,
    pub search: Option<String>,
}

impl FormInputs {
    fn field_mut(&mut self, field: InputField) -> &mut Option<String> {
        match field {
            InputField::Lat => &mut self.lat,
            InputField::Lng => &mut self.lng,
            InputField::Radius => &mut self.radius,
            InputField::Polygon => &mut self.polygon,
        }
    }
}

/// Keeps the form inputs and the map overlays in sync.
///
/// Each [`WidgetEvent`] updates the state and yields the commands the map
/// surface and the form must apply. Applying a command does not produce a
/// new event.
#[derive(Debug, Clone)]
pub struct Widget {
    config: WidgetConfig,
    center: Coordinate,
    /// In the configured radius unit
    radius: f64,
    polygon: Ring,
    inputs: FormInputs,
}

impl Widget {
    /// Resolve the initial state. Valid input values win over configured
    /// ones, which win over the built-in fallbacks.
    pub fn new(config: WidgetConfig, inputs: FormInputs) -> Self {
        let lat = inputs
            .lat
            .as_deref()
            .map(str::trim)
            .filter(|t| is_valid_latitude(t))
            .and_then(|t| t.parse().ok())
            .or(config.lat)
            .unwrap_or(0.0);
        let lng = inputs
            .lng
            .as_deref()
            .map(str::trim)
            .filter(|t| is_valid_longitude(t))
            .and_then(|t| t.parse().ok())
            .or(config.lng)
            .unwrap_or(0.0);
        let center = Coordinate::new(lat, lng);

        let radius = inputs
            .radius
            .as_deref()
            .and_then(parse_radius)
            .or(config.radius)
            .unwrap_or(1.0);

        let input_path = inputs
            .polygon
            .as_deref()
            .map(polygon_wkt_to_array)
            .unwrap_or_default();

        let polygon = if is_valid_polygon_path(&input_path) {
            Ring::new(input_path)
        } else {
            match config.polygon.as_deref() {
                None => Ring::default_square(center, config.polygon_radius),
                Some(wkt) => {
                    let path = polygon_wkt_to_array(wkt);
                    if is_valid_polygon_path(&path) {
                        Ring::new(path)
                    } else {
                        tracing::warn!("Configured polygon is not a valid closed ring: {wkt}");
                        Ring::default()
                    }
                }
            }
        };

        Self {
            config,
            center,
            radius,
            polygon,
            inputs,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn polygon(&self) -> &Ring {
        &self.polygon
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    /// Commands that build the map for the initial state
    pub fn initial_commands(&self) -> Vec<SurfaceCommand> {
        let editable = !self.config.disabled;
        let mut commands = vec![SurfaceCommand::ShowMap {
            center: self.center,
            zoom: self.config.zoom,
            interactive: editable,
            map_id: self.config.map_id.clone(),
        }];

        if self.config.enable_marker {
            commands.push(SurfaceCommand::PlaceMarker {
                position: self.center,
                draggable: editable,
                animate: self.config.animate,
            });
        }

        if self.config.enable_radius {
            commands.push(SurfaceCommand::ShowCircle {
                center: self.center,
                radius_m: self.radius_m(),
                style: self.config.circle_style.clone(),
                editable,
            });
        }

        if self.config.enable_polygon {
            commands.push(SurfaceCommand::ShowPolygon {
                ring: self.polygon.clone(),
                style: self.config.polygon_style.clone(),
                editable,
            });
        }

        if let Some(bounds) = self.shape_bounds() {
            commands.push(SurfaceCommand::FitBounds { bounds });
        }

        if self.config.disabled {
            commands.push(SurfaceCommand::DisableInputs);
        }

        commands
    }

    /// Apply one event. A disabled widget ignores everything.
    pub fn handle(&mut self, event: WidgetEvent) -> Vec<SurfaceCommand> {
        if self.config.disabled {
            tracing::debug!(?event, "widget disabled, ignoring event");
            return Vec::new();
        }

        let mut commands = Vec::new();

        match event {
            WidgetEvent::CoordinateInputChanged { lat, lng } => {
                let parsed = Coordinate::parse(&lat, &lng);
                self.inputs.lat = Some(lat);
                self.inputs.lng = Some(lng);

                match parsed {
                    Ok(position) => {
                        self.center = position;
                        self.move_marker(true, &mut commands);
                        self.move_polygon(&mut commands);
                        self.move_circle(&mut commands);
                        self.lookup_address(&mut commands);
                    }
                    Err(e) => tracing::debug!("{e}"),
                }
            }
            WidgetEvent::RadiusInputChanged { value } => {
                let parsed = parse_radius(&value);
                self.inputs.radius = Some(value);

                if self.config.enable_radius
                    && let Some(radius) = parsed
                {
                    self.radius = radius;
                    commands.push(SurfaceCommand::ResizeCircle {
                        radius_m: self.radius_m(),
                    });
                }
            }
            WidgetEvent::PolygonInputChanged { value } => {
                let path = polygon_wkt_to_array(&value);
                self.inputs.polygon = Some(value);

                if self.config.enable_polygon && is_valid_polygon_path(&path) {
                    self.polygon = Ring::new(path);
                    commands.push(SurfaceCommand::SetPolygonPath {
                        ring: self.polygon.clone(),
                    });
                }
            }
            WidgetEvent::MarkerDragged { position } => {
                self.center = position;
                self.write_coordinate_inputs(&mut commands);
                self.move_circle(&mut commands);
                self.move_polygon(&mut commands);
                self.lookup_address(&mut commands);
            }
            WidgetEvent::CircleMoved { center } => {
                self.center = center;
                self.move_marker(false, &mut commands);
                self.move_polygon(&mut commands);
                self.write_coordinate_inputs(&mut commands);
                self.lookup_address(&mut commands);
            }
            WidgetEvent::CircleResized { radius_m } => {
                self.radius = self.config.radius_from_meters(radius_m);
                let value = self.config.format_input_radius(radius_m);
                self.write_input(InputField::Radius, value, &mut commands);
            }
            WidgetEvent::PolygonDragged { ring } => {
                let Some(bounds) = ring.bounds() else {
                    tracing::debug!("dragged polygon has no vertices");
                    return commands;
                };
                self.polygon = ring;
                self.center = bounds.center();
                self.move_marker(false, &mut commands);
                self.move_circle(&mut commands);
                self.write_polygon_input(&mut commands);
                self.write_coordinate_inputs(&mut commands);
                self.lookup_address(&mut commands);
            }
            WidgetEvent::MapClicked { position } => {
                if self.config.enable_polygon {
                    let index = self.polygon.insert_near(position);
                    tracing::debug!(index, "inserted polygon vertex");
                    commands.push(SurfaceCommand::SetPolygonPath {
                        ring: self.polygon.clone(),
                    });
                    self.write_polygon_input(&mut commands);
                }
            }
            WidgetEvent::VertexRemoved { index } => {
                if self.config.enable_polygon && self.polygon.remove_vertex(index).is_some() {
                    commands.push(SurfaceCommand::SetPolygonPath {
                        ring: self.polygon.clone(),
                    });
                    self.write_polygon_input(&mut commands);
                }
            }
            WidgetEvent::VertexMoved { index, position } => {
                if self.config.enable_polygon && self.polygon.set_vertex(index, position) {
                    self.write_polygon_input(&mut commands);
                }
            }
            WidgetEvent::PlaceSelected { position } => {
                self.center = position;
                self.move_marker(false, &mut commands);
                self.move_polygon(&mut commands);
                self.move_circle(&mut commands);

                let mut bounds = Bounds::from_point(position);
                if let Some(shapes) = self.shape_bounds() {
                    bounds = bounds.union(&shapes);
                }
                commands.push(SurfaceCommand::FitBounds { bounds });
                if !(self.config.enable_polygon || self.config.enable_radius) {
                    commands.push(SurfaceCommand::SetZoom { zoom: PLACE_ZOOM });
                }

                self.write_coordinate_inputs(&mut commands);
            }
            WidgetEvent::ClearRequested => {
                for field in [
                    InputField::Lat,
                    InputField::Lng,
                    InputField::Radius,
                    InputField::Polygon,
                ] {
                    self.write_input(field, String::new(), &mut commands);
                }
            }
        }

        commands
    }

    fn radius_m(&self) -> f64 {
        self.config.radius_to_meters(self.radius)
    }

    fn shape_bounds(&self) -> Option<Bounds> {
        let circle = self
            .config
            .enable_radius
            .then(|| Bounds::around_circle(self.center, self.radius_m()));
        let polygon = if self.config.enable_polygon {
            self.polygon.bounds()
        } else {
            None
        };

        match (circle, polygon) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    fn move_marker(&self, pan: bool, commands: &mut Vec<SurfaceCommand>) {
        if self.config.enable_marker {
            commands.push(SurfaceCommand::MoveMarker {
                position: self.center,
                pan,
            });
        }
    }

    fn move_circle(&self, commands: &mut Vec<SurfaceCommand>) {
        if self.config.enable_radius {
            commands.push(SurfaceCommand::MoveCircle {
                center: self.center,
            });
        }
    }

    fn move_polygon(&mut self, commands: &mut Vec<SurfaceCommand>) {
        if self.config.enable_polygon {
            self.polygon = self.polygon.moved_to(self.center, self.config.move_mode());
            commands.push(SurfaceCommand::SetPolygonPath {
                ring: self.polygon.clone(),
            });
            self.write_polygon_input(commands);
        }
    }

    fn lookup_address(&self, commands: &mut Vec<SurfaceCommand>) {
        if self.inputs.search.is_some() {
            commands.push(SurfaceCommand::LookupAddress {
                position: self.center,
            });
        }
    }

    fn write_coordinate_inputs(&mut self, commands: &mut Vec<SurfaceCommand>) {
        let (lat, lng) = self.center.to_fixed(COORDINATE_DECIMALS);
        self.write_input(InputField::Lat, lat, commands);
        self.write_input(InputField::Lng, lng, commands);
    }

    fn write_polygon_input(&mut self, commands: &mut Vec<SurfaceCommand>) {
        let wkt = path_to_wkt(self.polygon.points());
        self.write_input(InputField::Polygon, wkt, commands);
    }

    /// Update a field the form actually has
    fn write_input(&mut self, field: InputField, value: String, commands: &mut Vec<SurfaceCommand>) {
        let slot = self.inputs.field_mut(field);
        if slot.is_some() {
            *slot = Some(value.clone());
            commands.push(SurfaceCommand::SetInput { field, value });
        }
    }
}
