//! Implementations for the projections used by the crate.
mod web_mercator;

pub use web_mercator::{SphericalMercator, WEB_MERCATOR_EXTENT};
