//! Widget configuration
//!
//! The effective [`WidgetConfig`] is built once from three layers, lowest
//! precedence first:
//!
//!   1. built-in defaults
//!   2. caller options ([`ConfigOverrides`], usually read from a TOML file)
//!   3. `data-*` attributes of the element hosting the widget
//!
//! A value set in a higher layer always wins, even when it equals the default.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::MoveMode;

const ATTRIBUTE_PREFIX: &str = "data-";

/// Unit the radius input is expressed in. Circles are always sized in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusUnit {
    #[default]
    M,
    Km,
}

impl RadiusUnit {
    /// `km` in any case selects kilometers, anything else meters
    pub fn parse(unit: &str) -> Self {
        if unit.eq_ignore_ascii_case("km") {
            RadiusUnit::Km
        } else {
            RadiusUnit::M
        }
    }
}

/// Stroke and fill of a map overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub stroke_opacity: f64,
    pub stroke_weight: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
}

impl ShapeStyle {
    fn with_color(color: &str) -> Self {
        Self {
            stroke_color: color.to_string(),
            stroke_opacity: 0.8,
            stroke_weight: 3.0,
            fill_color: color.to_string(),
            fill_opacity: 0.2,
        }
    }
}

/// Effective widget configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetConfig {
    /// Initial center, used when the inputs hold no valid value
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Initial radius in `radius_unit`
    pub radius: Option<f64>,
    /// Initial polygon as WKT
    pub polygon: Option<String>,
    pub zoom: u8,
    pub disabled: bool,
    pub animate: bool,
    pub enable_marker: bool,
    pub enable_radius: bool,
    pub radius_unit: RadiusUnit,
    /// Decimals written to the radius input
    pub radius_precision: usize,
    pub enable_polygon: bool,
    /// Half-width in meters of the default square polygon
    pub polygon_radius: f64,
    pub polygon_geodesic: bool,
    pub map_id: String,
    pub circle_style: ShapeStyle,
    pub polygon_style: ShapeStyle,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            radius: None,
            polygon: None,
            zoom: 14,
            disabled: false,
            animate: true,
            enable_marker: true,
            enable_radius: false,
            radius_unit: RadiusUnit::M,
            radius_precision: 0,
            enable_polygon: false,
            polygon_radius: 10.0,
            polygon_geodesic: false,
            map_id: "DEMO_MAP_ID".to_string(),
            circle_style: ShapeStyle::with_color("#FF9800"),
            polygon_style: ShapeStyle::with_color("#FF5722"),
        }
    }
}

impl WidgetConfig {
    /// Merge caller options and element attributes over the defaults
    pub fn layered<'a>(
        options: &ConfigOverrides,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut merged = options.clone();
        merged.merge(ConfigOverrides::from_attributes(attributes));

        let mut config = Self::default();
        config.apply(merged);
        config
    }

    fn apply(&mut self, o: ConfigOverrides) {
        self.lat = o.lat.or(self.lat);
        self.lng = o.lng.or(self.lng);
        self.radius = o.radius.or(self.radius);
        self.polygon = o.polygon.or(self.polygon.take());
        self.zoom = o.zoom.unwrap_or(self.zoom);
        self.disabled = o.disabled.unwrap_or(self.disabled);
        self.animate = o.animate.unwrap_or(self.animate);
        self.enable_marker = o.enable_marker.unwrap_or(self.enable_marker);
        self.enable_radius = o.enable_radius.unwrap_or(self.enable_radius);
        self.radius_unit = o.radius_unit.unwrap_or(self.radius_unit);
        self.radius_precision = o.radius_precision.unwrap_or(self.radius_precision);
        self.enable_polygon = o.enable_polygon.unwrap_or(self.enable_polygon);
        self.polygon_radius = o.polygon_radius.unwrap_or(self.polygon_radius);
        self.polygon_geodesic = o.polygon_geodesic.unwrap_or(self.polygon_geodesic);
        if let Some(map_id) = o.map_id {
            self.map_id = map_id;
        }

        let circle = &mut self.circle_style;
        if let Some(color) = o.circle_stroke_color {
            circle.stroke_color = color;
        }
        circle.stroke_opacity = o.circle_stroke_opacity.unwrap_or(circle.stroke_opacity);
        circle.stroke_weight = o.circle_stroke_weight.unwrap_or(circle.stroke_weight);
        if let Some(color) = o.circle_fill_color {
            circle.fill_color = color;
        }
        circle.fill_opacity = o.circle_fill_opacity.unwrap_or(circle.fill_opacity);

        let polygon = &mut self.polygon_style;
        if let Some(color) = o.polygon_stroke_color {
            polygon.stroke_color = color;
        }
        polygon.stroke_opacity = o.polygon_stroke_opacity.unwrap_or(polygon.stroke_opacity);
        polygon.stroke_weight = o.polygon_stroke_weight.unwrap_or(polygon.stroke_weight);
        if let Some(color) = o.polygon_fill_color {
            polygon.fill_color = color;
        }
        polygon.fill_opacity = o.polygon_fill_opacity.unwrap_or(polygon.fill_opacity);
    }

    pub fn move_mode(&self) -> MoveMode {
        if self.polygon_geodesic {
            MoveMode::Geodesic
        } else {
            MoveMode::Planar
        }
    }

    /// Convert a radius in `radius_unit` to meters
    pub fn radius_to_meters(&self, radius: f64) -> f64 {
        match self.radius_unit {
            RadiusUnit::Km => radius * 1000.0,
            RadiusUnit::M => radius,
        }
    }

    /// Convert a circle radius in meters to `radius_unit`
    pub fn radius_from_meters(&self, meters: f64) -> f64 {
        match self.radius_unit {
            RadiusUnit::Km => meters / 1000.0,
            RadiusUnit::M => meters,
        }
    }

    /// Text for the radius input from a circle radius in meters
    pub fn format_input_radius(&self, meters: f64) -> String {
        format!("{:.*}", self.radius_precision, self.radius_from_meters(meters))
    }
}

/// A `data-*` attribute that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// One configuration layer. Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub polygon: Option<String>,
    pub zoom: Option<u8>,
    pub disabled: Option<bool>,
    pub animate: Option<bool>,
    pub enable_marker: Option<bool>,
    pub enable_radius: Option<bool>,
    pub radius_unit: Option<RadiusUnit>,
    pub radius_precision: Option<usize>,
    pub enable_polygon: Option<bool>,
    pub polygon_radius: Option<f64>,
    pub polygon_geodesic: Option<bool>,
    pub map_id: Option<String>,
    pub circle_stroke_color: Option<String>,
    pub circle_stroke_opacity: Option<f64>,
    pub circle_stroke_weight: Option<f64>,
    pub circle_fill_color: Option<String>,
    pub circle_fill_opacity: Option<f64>,
    pub polygon_stroke_color: Option<String>,
    pub polygon_stroke_opacity: Option<f64>,
    pub polygon_stroke_weight: Option<f64>,
    pub polygon_fill_color: Option<String>,
    pub polygon_fill_opacity: Option<f64>,
}

impl ConfigOverrides {
    /// Read the first config file found in the standard locations
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config file");
                        return Some(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Read an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Collect the `data-*` attributes of an element.
    ///
    /// Attributes that are unknown or hold an unusable value are skipped.
    pub fn from_attributes<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut overrides = Self::default();

        for (name, value) in attributes {
            let Some(key) = name.strip_prefix(ATTRIBUTE_PREFIX) else {
                continue;
            };
            let key = key.replace('-', "_");

            // Marker attribute that binds the widget, not a setting
            if key == "map_selector" {
                continue;
            }

            match overrides.set(&key, value) {
                Ok(()) => {}
                Err(e @ AttributeError::UnknownKey(_)) => tracing::debug!("{e}"),
                Err(e) => tracing::warn!("Ignoring attribute {name}: {e}"),
            }
        }

        overrides
    }

    /// Set one field from its text form.
    ///
    /// Booleans are true only for the exact text `true`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), AttributeError> {
        let flag = || Some(value == "true");
        let text = || Some(value.to_string());

        match key {
            "lat" => self.lat = number(key, value)?,
            "lng" => self.lng = number(key, value)?,
            "radius" => self.radius = number(key, value)?,
            "polygon" => self.polygon = text(),
            "zoom" => self.zoom = number(key, value)?,
            "disabled" => self.disabled = flag(),
            "animate" => self.animate = flag(),
            "enable_marker" => self.enable_marker = flag(),
            "enable_radius" => self.enable_radius = flag(),
            "radius_unit" => self.radius_unit = Some(RadiusUnit::parse(value)),
            "radius_precision" => self.radius_precision = number(key, value)?,
            "enable_polygon" => self.enable_polygon = flag(),
            "polygon_radius" => self.polygon_radius = number(key, value)?,
            "polygon_geodesic" => self.polygon_geodesic = flag(),
            "map_id" => self.map_id = text(),
            "circle_stroke_color" => self.circle_stroke_color = text(),
            "circle_stroke_opacity" => self.circle_stroke_opacity = number(key, value)?,
            "circle_stroke_weight" => self.circle_stroke_weight = number(key, value)?,
            "circle_fill_color" => self.circle_fill_color = text(),
            "circle_fill_opacity" => self.circle_fill_opacity = number(key, value)?,
            "polygon_stroke_color" => self.polygon_stroke_color = text(),
            "polygon_stroke_opacity" => self.polygon_stroke_opacity = number(key, value)?,
            "polygon_stroke_weight" => self.polygon_stroke_weight = number(key, value)?,
            "polygon_fill_color" => self.polygon_fill_color = text(),
            "polygon_fill_opacity" => self.polygon_fill_opacity = number(key, value)?,
            _ => return Err(AttributeError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Overlay `top` on this layer
    pub fn merge(&mut self, top: ConfigOverrides) {
        self.lat = top.lat.or(self.lat);
        self.lng = top.lng.or(self.lng);
        self.radius = top.radius.or(self.radius);
        self.polygon = top.polygon.or(self.polygon.take());
        self.zoom = top.zoom.or(self.zoom);
        self.disabled = top.disabled.or(self.disabled);
        self.animate = top.animate.or(self.animate);
        self.enable_marker = top.enable_marker.or(self.enable_marker);
        self.enable_radius = top.enable_radius.or(self.enable_radius);
        self.radius_unit = top.radius_unit.or(self.radius_unit);
        self.radius_precision = top.radius_precision.or(self.radius_precision);
        self.enable_polygon = top.enable_polygon.or(self.enable_polygon);
        self.polygon_radius = top.polygon_radius.or(self.polygon_radius);
        self.polygon_geodesic = top.polygon_geodesic.or(self.polygon_geodesic);
        self.map_id = top.map_id.or(self.map_id.take());
        self.circle_stroke_color = top.circle_stroke_color.or(self.circle_stroke_color.take());
        self.circle_stroke_opacity = top.circle_stroke_opacity.or(self.circle_stroke_opacity);
        self.circle_stroke_weight = top.circle_stroke_weight.or(self.circle_stroke_weight);
        self.circle_fill_color = top.circle_fill_color.or(self.circle_fill_color.take());
        self.circle_fill_opacity = top.circle_fill_opacity.or(self.circle_fill_opacity);
        self.polygon_stroke_color = top.polygon_stroke_color.or(self.polygon_stroke_color.take());
        self.polygon_stroke_opacity = top.polygon_stroke_opacity.or(self.polygon_stroke_opacity);
        self.polygon_stroke_weight = top.polygon_stroke_weight.or(self.polygon_stroke_weight);
        self.polygon_fill_color = top.polygon_fill_color.or(self.polygon_fill_color.take());
        self.polygon_fill_opacity = top.polygon_fill_opacity.or(self.polygon_fill_opacity);
    }
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<Option<T>, AttributeError> {
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| AttributeError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("mapinput.toml"));
    paths.push(PathBuf::from(".mapinput.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mapinput").join("config.toml"));
        paths.push(config_dir.join("mapinput.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".mapinput.toml"));
        paths.push(home.join(".config").join("mapinput").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NO_ATTRIBUTES: [(&str, &str); 0] = [];

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::layered(&ConfigOverrides::default(), NO_ATTRIBUTES);
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.zoom, 14);
        assert_eq!(config.polygon_radius, 10.0);
        assert_eq!(config.circle_style.stroke_color, "#FF9800");
        assert_eq!(config.polygon_style.fill_opacity, 0.2);
        assert_eq!(config.move_mode(), MoveMode::Planar);
    }

    #[test]
    fn test_attributes_override_options() {
        let options = ConfigOverrides {
            zoom: Some(10),
            enable_radius: Some(true),
            radius_unit: Some(RadiusUnit::Km),
            ..Default::default()
        };
        let attributes = [
            ("data-zoom", "16"),
            ("data-radius-unit", "m"),
            ("class", "map"),
        ];

        let config = WidgetConfig::layered(&options, attributes);

        assert_eq!(config.zoom, 16);
        assert_eq!(config.radius_unit, RadiusUnit::M);
        // Not overridden by attributes, so the caller option stays
        assert!(config.enable_radius);
    }

    #[test]
    fn test_attribute_equal_to_default_still_wins() {
        let options = ConfigOverrides {
            enable_marker: Some(false),
            ..Default::default()
        };
        let config = WidgetConfig::layered(&options, [("data-enable-marker", "true")]);
        assert!(config.enable_marker);
    }

    #[test]
    fn test_attribute_conversion() {
        let overrides = ConfigOverrides::from_attributes([
            ("data-map-selector", "true"),
            ("data-disabled", "yes"),
            ("data-animate", "true"),
            ("data-lat", "12.5"),
            ("data-polygon-radius", "abc"),
            ("data-polygon", "POLYGON((2 1, 4 3, 6 5, 2 1))"),
            ("data-pin-icon", "star"),
            ("data-circle-fill-color", "#000000"),
        ]);

        assert_eq!(overrides.disabled, Some(false));
        assert_eq!(overrides.animate, Some(true));
        assert_eq!(overrides.lat, Some(12.5));
        assert_eq!(overrides.polygon_radius, None);
        assert_eq!(
            overrides.polygon.as_deref(),
            Some("POLYGON((2 1, 4 3, 6 5, 2 1))")
        );
        assert_eq!(overrides.circle_fill_color.as_deref(), Some("#000000"));
    }

    #[test]
    fn test_set_errors() {
        let mut overrides = ConfigOverrides::default();
        assert_eq!(
            overrides.set("pin_icon", "star"),
            Err(AttributeError::UnknownKey("pin_icon".to_string()))
        );
        assert!(matches!(
            overrides.set("zoom", "300"),
            Err(AttributeError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_radius_units() {
        let mut config = WidgetConfig::default();
        assert_eq!(config.radius_to_meters(250.0), 250.0);
        assert_eq!(config.format_input_radius(1234.6), "1235");

        config.radius_unit = RadiusUnit::Km;
        config.radius_precision = 2;
        assert_eq!(config.radius_to_meters(1.5), 1500.0);
        assert_eq!(config.format_input_radius(1234.0), "1.23");
    }

    #[test]
    fn test_radius_unit_parse() {
        assert_eq!(RadiusUnit::parse("KM"), RadiusUnit::Km);
        assert_eq!(RadiusUnit::parse("km"), RadiusUnit::Km);
        assert_eq!(RadiusUnit::parse("miles"), RadiusUnit::M);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
enable_polygon = true
polygon_radius = 25.0
radius_unit = "km"
polygon_stroke_color = "#123456"
"##
        )
        .unwrap();

        let overrides = ConfigOverrides::from_path(file.path()).unwrap();
        assert_eq!(overrides.enable_polygon, Some(true));
        assert_eq!(overrides.radius_unit, Some(RadiusUnit::Km));

        let config = WidgetConfig::layered(&overrides, NO_ATTRIBUTES);
        assert_eq!(config.polygon_radius, 25.0);
        assert_eq!(config.polygon_style.stroke_color, "#123456");
        assert_eq!(config.polygon_style.fill_color, "#FF5722");
    }

    #[test]
    fn test_from_path_errors() {
        assert!(ConfigOverrides::from_path(Path::new("/nonexistent/mapinput.toml")).is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "zoom = \"far\"").unwrap();
        assert!(ConfigOverrides::from_path(file.path()).is_err());
    }
}
