//! Geoharvest retrieves feature layers from OGC Web Feature Services and turns them into tabular data ready to be
//! loaded into a spatial database.
//!
//! # Quick start
//!
//! ```no_run
//! use geoharvest::presets::{GebiedenLayer, DEFAULT_ENDPOINT};
//! use geoharvest::service::http::ReqwestClient;
//! use geoharvest::service::{LayerFetcher, WfsEndpoint};
//!
//! # fn main() -> Result<(), geoharvest::error::HarvestError> {
//! let endpoint = WfsEndpoint::new(DEFAULT_ENDPOINT)?;
//! let fetcher = LayerFetcher::new(ReqwestClient::new()?);
//!
//! let buurten = GebiedenLayer::Buurten.fetch(&fetcher, &endpoint)?;
//! println!("{}: {} rows", buurten.name(), buurten.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Main components
//!
//! * [`service`] talks to the WFS: [`list_layers`](service::list_layers) reads the capabilities document and
//!   [`LayerFetcher`](service::LayerFetcher) downloads one layer, retrying failed requests according to a
//!   [`RetryPolicy`](service::RetryPolicy). The outcome of a fetch is a [`FetchResult`](service::FetchResult) that
//!   tells whether the layer was retrieved, rejected by the server or given up after the last attempt.
//! * [`layer`] holds [`TabularLayer`](layer::TabularLayer), the result of
//!   [`normalizing`](layer::normalize) a feature collection: a fixed set of renamed attribute columns plus the
//!   geometry of every feature. Layers can be re-projected, extended with Web Mercator coordinate columns, exported
//!   back to GeoJSON or written as CSV for a [`BulkLoader`](layer::loader::BulkLoader).
//! * [`config`] reads database connection settings from an INI file.
//! * [`presets`] describes the area layers of the Amsterdam `gebieden` service.
//!
//! Coordinate systems and the Web Mercator projection live in the [`geoharvest_types`] crate, re-exported here.
//!
//! The library reports progress through the [`log`](https://docs.rs/log) facade. Initialize any logger
//! implementation (e.g. `env_logger`) to see it.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod layer;
pub mod presets;
pub mod service;

#[cfg(test)]
mod tests;

pub use layer::TabularLayer;
pub use service::{LayerDescriptor, LayerFetcher, WfsEndpoint};

// Reexport geoharvest_types
pub use geoharvest_types;
