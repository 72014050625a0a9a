//! Widget state machine driving a map surface and a set of form inputs

pub mod events;
pub mod state;

pub use events::{InputField, SurfaceCommand, WidgetEvent};
pub use state::{FormInputs, Widget};
