//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// Coordinate lies outside the domain of the requested projection.
    #[error("coordinate ({x}, {y}) is outside of the projection domain")]
    CoordinateDomain {
        /// First coordinate of the rejected point (longitude or easting).
        x: f64,
        /// Second coordinate of the rejected point (latitude or northing).
        y: f64,
    },
    /// EPSG code that is not present in the registry.
    #[error("unknown EPSG code: {0}")]
    UnknownEpsg(u32),
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
}
