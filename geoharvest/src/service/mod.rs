//! Access to an OGC Web Feature Service: discovering layers ([`list_layers`]) and retrieving features of one layer
//! ([`LayerFetcher`]).

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geoharvest_types::geo::Crs;
use reqwest::Url;

use crate::error::HarvestError;

mod capabilities;
mod fetcher;
pub mod http;

pub use capabilities::{list_layers, parse_capabilities, WFS_NAMESPACE};
pub use fetcher::{FetchPayload, FetchResult, FetchState, LayerFetcher, RetryPolicy};

/// Base URL of a WFS service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfsEndpoint {
    url: Url,
}

impl WfsEndpoint {
    /// Parses the base url of the service, e.g. `https://map.data.amsterdam.nl/maps/gebieden`.
    pub fn new(url: &str) -> Result<Self, HarvestError> {
        let url = Url::parse(url)
            .map_err(|err| HarvestError::InvalidDescriptor(format!("invalid url {url}: {err}")))?;
        if url.cannot_be_a_base() {
            return Err(HarvestError::InvalidDescriptor(format!(
                "{url} cannot be used as a service url"
            )));
        }

        Ok(Self { url })
    }

    /// Base url of the service.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Url of a request with the given query parameters appended to the base url.
    pub fn request_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }
}

impl Display for WfsEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Format of the `GetFeature` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Server default Geography Markup Language.
    #[default]
    Gml,
    /// GeoJSON feature collection.
    GeoJson,
    /// JSON feature collection.
    Json,
    /// Plain text.
    Txt,
    /// Zipped shapefile.
    ShapeZip,
}

impl OutputFormat {
    /// Value of the `OUTPUTFORMAT` parameter, `None` for the server default.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Gml => None,
            OutputFormat::GeoJson => Some("geojson"),
            OutputFormat::Json => Some("json"),
            OutputFormat::Txt => Some("txt"),
            OutputFormat::ShapeZip => Some("shapezip"),
        }
    }

    /// Whether the response is parsed into a feature collection.
    pub fn is_geojson(&self) -> bool {
        matches!(self, OutputFormat::GeoJson | OutputFormat::Json)
    }
}

impl FromStr for OutputFormat {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "gml" => Ok(OutputFormat::Gml),
            "geojson" => Ok(OutputFormat::GeoJson),
            "json" => Ok(OutputFormat::Json),
            "txt" => Ok(OutputFormat::Txt),
            "shapezip" => Ok(OutputFormat::ShapeZip),
            other => Err(HarvestError::InvalidDescriptor(format!(
                "unsupported output format: {other}"
            ))),
        }
    }
}

/// Layer to request from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    name: String,
    crs: Crs,
    output_format: OutputFormat,
}

impl LayerDescriptor {
    /// Creates a descriptor. The name must not be empty and the EPSG code must be known to
    /// [`Crs::from_epsg`].
    pub fn new(
        name: impl Into<String>,
        epsg: u32,
        output_format: OutputFormat,
    ) -> Result<Self, HarvestError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(HarvestError::InvalidDescriptor(
                "layer name must not be empty".into(),
            ));
        }

        let crs =
            Crs::from_epsg(epsg).map_err(|err| HarvestError::InvalidDescriptor(err.to_string()))?;

        Ok(Self {
            name,
            crs,
            output_format,
        })
    }

    /// Name of the layer (`TYPENAME`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinate system of the returned geometries.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Requested output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Query parameters of the `GetFeature` request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("REQUEST", "GetFeature".to_string()),
            ("TYPENAME", self.name.clone()),
            ("SERVICE", "WFS".to_string()),
            ("VERSION", "2.0.0".to_string()),
            ("SRSNAME", self.crs.srs_name()),
        ];
        if let Some(format) = self.output_format.parameter() {
            query.push(("OUTPUTFORMAT", format.to_string()));
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn descriptor_validation() {
        assert_matches!(
            LayerDescriptor::new("", 28992, OutputFormat::GeoJson),
            Err(HarvestError::InvalidDescriptor(_))
        );
        assert_matches!(
            LayerDescriptor::new("buurt", 1, OutputFormat::GeoJson),
            Err(HarvestError::InvalidDescriptor(_))
        );

        let descriptor = LayerDescriptor::new("buurt", 28992, OutputFormat::GeoJson).unwrap();
        assert_eq!(descriptor.name(), "buurt");
        assert_eq!(descriptor.crs(), Crs::RD_NEW);
    }

    #[test]
    fn get_feature_query() {
        let descriptor = LayerDescriptor::new("stadsdeel", 28992, OutputFormat::GeoJson).unwrap();
        let endpoint = WfsEndpoint::new("https://map.data.amsterdam.nl/maps/gebieden").unwrap();
        let query = descriptor.query();
        let params: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

        assert_eq!(
            endpoint.request_url(&params).as_str(),
            "https://map.data.amsterdam.nl/maps/gebieden?REQUEST=GetFeature&TYPENAME=stadsdeel&SERVICE=WFS\
             &VERSION=2.0.0&SRSNAME=EPSG%3A28992&OUTPUTFORMAT=geojson"
        );
    }

    #[test]
    fn gml_uses_server_default() {
        let descriptor = LayerDescriptor::new("buurt", 4326, OutputFormat::Gml).unwrap();
        assert!(descriptor.query().iter().all(|(k, _)| *k != "OUTPUTFORMAT"));
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("GeoJSON".parse::<OutputFormat>().unwrap(), OutputFormat::GeoJson);
        assert_eq!("".parse::<OutputFormat>().unwrap(), OutputFormat::Gml);
        assert!("kml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn invalid_endpoint() {
        assert_matches!(
            WfsEndpoint::new("not a url"),
            Err(HarvestError::InvalidDescriptor(_))
        );
        assert_matches!(
            WfsEndpoint::new("mailto:gis@example.com"),
            Err(HarvestError::InvalidDescriptor(_))
        );
    }
}
