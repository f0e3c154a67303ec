//! Error types used by the crate.

use geoharvest_types::error::TypesError;
use thiserror::Error;

/// Geoharvest error type.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Network or HTTP level failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response body is not a valid XML or JSON document of the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),
    /// The service rejected the layer name (HTTP 400 on `GetFeature`).
    #[error("incorrect layer name: {0}")]
    InvalidLayerName(String),
    /// Every attempt returned a failure status.
    #[error("request failed after {attempts} attempts (last status: {last_status:?})")]
    RetriesExhausted {
        /// Number of requests issued.
        attempts: u32,
        /// HTTP status of the last response, `None` if the last attempt failed at transport level.
        last_status: Option<u16>,
    },
    /// Coordinate of a layer row cannot be projected.
    #[error("row {row}: {source}")]
    CoordinateDomain {
        /// Index of the offending row.
        row: usize,
        /// Projection failure.
        #[source]
        source: TypesError,
    },
    /// Expected attribute is missing or has unexpected type.
    #[error("schema error: {0}")]
    Schema(String),
    /// Layer descriptor or endpoint cannot be constructed from the given values.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    /// Error writing tabular data.
    #[error("failed to write data")]
    Io(#[from] std::io::Error),
    /// Error writing CSV records.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Error serializing a geometry.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for HarvestError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<quick_xml::Error> for HarvestError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<geojson::Error> for HarvestError {
    fn from(value: geojson::Error) -> Self {
        Self::Parse(value.to_string())
    }
}
