pub mod bounds;
pub mod offset;
pub mod projection;
pub mod spherical;

pub use bounds::Bounds;
pub use offset::{
    EARTH_COEFFICIENT, Offset, calculate_latitude, calculate_longitude,
    create_default_polygon_path,
};
pub use spherical::{
    EARTH_RADIUS_KM, Vector3, angle_between_three_points, angle_between_vectors,
    calculate_distance, to_cartesian, vector,
};
