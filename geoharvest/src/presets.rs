//! Area layers of the Amsterdam `gebieden` WFS service.

use std::collections::HashMap;

use log::info;

use crate::error::HarvestError;
use crate::layer::TabularLayer;
use crate::service::http::HttpClient;
use crate::service::{LayerDescriptor, LayerFetcher, OutputFormat, WfsEndpoint};

/// Base url of the Amsterdam `gebieden` service.
pub const DEFAULT_ENDPOINT: &str = "https://map.data.amsterdam.nl/maps/gebieden";

/// EPSG code of the Dutch national grid (Amersfoort / RD New) the layers are requested in.
pub const RD_NEW_EPSG: u32 = 28992;

/// Administrative areas published by the `gebieden` service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GebiedenLayer {
    /// Boroughs, e.g. `West`.
    Stadsdelen,
    /// Districts, e.g. `De Pijp`.
    BuurtCombinaties,
    /// Neighbourhoods, e.g. `Gein Zuidoost`.
    Buurten,
}

impl GebiedenLayer {
    /// All presets.
    pub const ALL: [GebiedenLayer; 3] = [
        GebiedenLayer::Stadsdelen,
        GebiedenLayer::BuurtCombinaties,
        GebiedenLayer::Buurten,
    ];

    /// Name of the layer in the service.
    pub fn layer_name(&self) -> &'static str {
        match self {
            GebiedenLayer::Stadsdelen => "stadsdeel",
            GebiedenLayer::BuurtCombinaties => "buurtcombinatie",
            GebiedenLayer::Buurten => "buurt",
        }
    }

    /// Request for the layer in RD New as GeoJSON.
    pub fn descriptor(&self) -> Result<LayerDescriptor, HarvestError> {
        LayerDescriptor::new(self.layer_name(), RD_NEW_EPSG, OutputFormat::GeoJson)
    }

    /// Feature properties kept in the tabular layer.
    pub fn keep_columns(&self) -> &'static [&'static str] {
        match self {
            GebiedenLayer::Stadsdelen => &["code", "geometry", "id", "naam"],
            GebiedenLayer::BuurtCombinaties | GebiedenLayer::Buurten => &["geometry", "id", "naam"],
        }
    }

    /// Column renames applied after selecting the kept properties.
    pub fn renames(&self) -> HashMap<String, String> {
        let pairs: &[(&str, &str)] = match self {
            GebiedenLayer::Stadsdelen => &[("code", "sd_code"), ("id", "sd_id"), ("naam", "sd_name")],
            GebiedenLayer::BuurtCombinaties => &[("id", "bc_id"), ("naam", "bc_name")],
            GebiedenLayer::Buurten => &[("id", "b_id"), ("naam", "b_name")],
        };

        pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    /// Label of the resulting layer, used as the target table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            GebiedenLayer::Stadsdelen => "stadsdelen",
            GebiedenLayer::BuurtCombinaties => "buurt_combinatie",
            GebiedenLayer::Buurten => "buurt",
        }
    }

    /// Retrieves the layer and converts it into a labeled [`TabularLayer`].
    pub fn fetch<C: HttpClient>(
        &self,
        fetcher: &LayerFetcher<C>,
        endpoint: &WfsEndpoint,
    ) -> Result<TabularLayer, HarvestError> {
        let collection = fetcher
            .fetch_layer(endpoint, &self.descriptor()?)
            .into_features()?;
        let layer = TabularLayer::from_features(
            self.table_name(),
            &collection,
            self.keep_columns(),
            &self.renames(),
        )?;

        info!("Layer {} has {} rows", layer.name(), layer.len());
        Ok(layer)
    }
}
