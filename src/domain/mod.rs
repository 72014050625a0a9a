pub mod coordinate;
pub mod ring;

pub use coordinate::{Coordinate, CoordinateError};
pub use ring::{MoveMode, Ring};
