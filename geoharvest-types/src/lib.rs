//! Geographic types for `geoharvest`: EPSG registry ([`geo::Crs`]), geographic and projected points, spherical Web
//! Mercator projection ([`geo::impls::projection::SphericalMercator`]) and re-projection of GeoJSON geometries.

pub mod cartesian;
pub mod error;
pub mod geo;
pub mod geojson;
