//! mapinput - Geodetic geometry and WKT polygon engine for map-based form inputs

pub mod config;
pub mod domain;
pub mod editing;
pub mod geometry;
pub mod validation;
pub mod widget;
pub mod wkt;
