//! Points in projected (cartesian) coordinates.

pub use nalgebra::Point2;

/// 2d point in a projected coordinate system. Units are defined by the system, usually meters.
pub type Point2d = Point2<f64>;
