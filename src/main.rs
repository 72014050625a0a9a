use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;

use mapinput::config::{ConfigOverrides, WidgetConfig};
use mapinput::domain::{Coordinate, Ring};
use mapinput::geometry::calculate_distance;
use mapinput::validation::{is_valid_polygon_path, parse_radius};
use mapinput::widget::{FormInputs, Widget, WidgetEvent};
use mapinput::wkt::{normalize_polygon_wkt, path_to_wkt, polygon_wkt, polygon_wkt_to_array};

/// Validate coordinates and edit WKT polygons the way the map input widget does
///
/// Examples:
///   # Check a coordinate pair
///   mapinput validate --lat 48.8584 --lng 2.2945
///
///   # Default 50 m square polygon around a point
///   mapinput square --lat 48.8584 --lng 2.2945 --radius 50
///
///   # Add a vertex where the user clicked
///   mapinput insert --wkt "POLYGON((2 1, 4 3, 6 5, 2 1))" --lat 2 --lng 5
///
///   # Replay recorded widget events with a polygon enabled
///   mapinput session events.json --attr enable-polygon=true
#[derive(Parser, Debug)]
#[command(name = "mapinput")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches mapinput.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a latitude/longitude pair
    Validate {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
    },
    /// Check a radius value
    ValidateRadius {
        #[arg(allow_hyphen_values = true)]
        radius: String,
    },
    /// Check that WKT text is a closed polygon ring
    ValidatePolygon { wkt: String },
    /// Great-circle distance in kilometers
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lng1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lng2: f64,
    },
    /// Default square polygon around a point
    Square {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Half-width in meters (defaults to the configured polygon radius)
        #[arg(short = 'r', long)]
        radius: Option<f64>,
    },
    /// Normalize WKT text
    Normalize { wkt: String },
    /// Parse WKT text into a JSON array of coordinates
    Parse { wkt: String },
    /// Insert a vertex into the edge nearest to a point
    Insert {
        #[arg(long)]
        wkt: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Replay widget events from a JSON session file and print the resulting commands
    Session {
        path: PathBuf,
        /// Element attribute, e.g. enable-polygon=true (repeatable)
        #[arg(long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
    /// Print the effective widget configuration
    Config {
        /// Element attribute, e.g. radius-unit=km (repeatable)
        #[arg(long = "attr", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
    },
}

/// Recorded initial form state and the events that followed
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SessionFile {
    inputs: FormInputs,
    events: Vec<WidgetEvent>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let overrides = match args.config {
        Some(ref config_path) => ConfigOverrides::from_path(config_path)?,
        None => ConfigOverrides::load().unwrap_or_default(),
    };

    match args.command {
        Command::Validate { lat, lng } => {
            let coordinate = Coordinate::parse(&lat, &lng)?;
            println!("valid: {}", coordinate);
        }
        Command::ValidateRadius { radius } => {
            let Some(radius) = parse_radius(&radius) else {
                bail!("Invalid radius: {:?}", radius);
            };
            println!("valid: {}", radius);
        }
        Command::ValidatePolygon { wkt } => {
            let path = polygon_wkt_to_array(&wkt);
            if !is_valid_polygon_path(&path) {
                bail!(
                    "Not a closed polygon ring ({} valid vertices): {}",
                    path.len(),
                    wkt
                );
            }
            println!("valid: {} vertices", path.len());
        }
        Command::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            let a = checked_coordinate(lat1, lng1)?;
            let b = checked_coordinate(lat2, lng2)?;
            println!("{:.6} km", calculate_distance(a, b));
        }
        Command::Square { lat, lng, radius } => {
            let center = checked_coordinate(lat, lng)?;
            let config = WidgetConfig::layered(&overrides, std::iter::empty::<(&str, &str)>());
            let radius = radius.unwrap_or(config.polygon_radius);
            if !(radius.is_finite() && radius >= 0.0) {
                bail!("Invalid radius: {}", radius);
            }
            let ring = Ring::default_square(center, radius);
            println!("{}", polygon_wkt(ring.points()));
        }
        Command::Normalize { wkt } => {
            println!("{}", normalize_polygon_wkt(&wkt));
        }
        Command::Parse { wkt } => {
            let path = polygon_wkt_to_array(&wkt);
            println!("{}", serde_json::to_string_pretty(&path)?);
        }
        Command::Insert { wkt, lat, lng } => {
            let point = checked_coordinate(lat, lng)?;
            let mut ring = Ring::new(polygon_wkt_to_array(&wkt));
            if ring.is_empty() {
                bail!("No valid vertices in {:?}", wkt);
            }
            let index = ring.insert_near(point);
            println!("index: {}", index);
            println!("{}", path_to_wkt(ring.points()));
        }
        Command::Session { path, attributes } => {
            let config = WidgetConfig::layered(&overrides, as_pairs(&attributes));
            run_session(&path, config)?;
        }
        Command::Config { attributes } => {
            let config = WidgetConfig::layered(&overrides, as_pairs(&attributes));
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_session(path: &Path, config: WidgetConfig) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {:?}", path))?;
    let session: SessionFile =
        serde_json::from_str(&contents).context("Failed to parse session file")?;

    tracing::info!(events = session.events.len(), "replaying session");

    let mut widget = Widget::new(config, session.inputs);
    let mut out = vec![serde_json::json!({
        "event": "init",
        "commands": widget.initial_commands(),
    })];

    for event in session.events {
        let label = serde_json::to_value(&event)?;
        let commands = widget.handle(event);
        out.push(serde_json::json!({
            "event": label,
            "commands": commands,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    tracing::debug!(inputs = ?widget.inputs(), "final form state");
    Ok(())
}

fn checked_coordinate(lat: f64, lng: f64) -> Result<Coordinate> {
    let coordinate = Coordinate::new(lat, lng);
    if !coordinate.is_in_range() {
        bail!("Invalid coordinate {}", coordinate);
    }
    Ok(coordinate)
}

/// `key=value`, with the `data-` prefix added when missing
fn parse_attribute(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty attribute name in {:?}", s));
    }
    let key = if key.starts_with("data-") {
        key.to_string()
    } else {
        format!("data-{}", key)
    };
    Ok((key, value.to_string()))
}

fn as_pairs(attributes: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}
