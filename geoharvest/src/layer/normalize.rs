use std::collections::HashMap;

use geojson::FeatureCollection;

use crate::error::HarvestError;
use crate::layer::{TabularLayer, GEOMETRY_COLUMN};

/// Converts a feature collection into a [`TabularLayer`].
///
/// Every feature becomes one row with its geometry and the properties listed in `keep_columns`, in that order.
/// Properties are renamed according to `rename_map`. Listing [`GEOMETRY_COLUMN`] in `keep_columns` is allowed and has
/// no effect since the geometry is always kept.
///
/// The result has an empty name. Label it with [`TabularLayer::with_name`] or use [`TabularLayer::from_features`]
/// before handing it downstream.
///
/// Fails with [`HarvestError::Schema`] if any feature misses one of the kept properties.
pub fn normalize(
    collection: &FeatureCollection,
    keep_columns: &[&str],
    rename_map: &HashMap<String, String>,
) -> Result<TabularLayer, HarvestError> {
    let attributes: Vec<&str> = keep_columns
        .iter()
        .copied()
        .filter(|column| *column != GEOMETRY_COLUMN)
        .collect();
    let columns = attributes
        .iter()
        .map(|column| {
            rename_map
                .get(*column)
                .cloned()
                .unwrap_or_else(|| column.to_string())
        })
        .collect();

    let mut layer = TabularLayer::new("", columns)?;
    for (index, feature) in collection.features.iter().enumerate() {
        let properties = feature.properties.as_ref();
        let values = attributes
            .iter()
            .map(|column| {
                properties
                    .and_then(|p| p.get(*column))
                    .cloned()
                    .ok_or_else(|| {
                        HarvestError::Schema(format!("feature {index} has no property {column}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        layer.push_row(feature.geometry.clone(), values)?;
    }

    Ok(layer)
}

impl TabularLayer {
    /// Normalizes the feature collection (see [`normalize`]) into a layer labeled `name`.
    pub fn from_features(
        name: impl Into<String>,
        collection: &FeatureCollection,
        keep_columns: &[&str],
        rename_map: &HashMap<String, String>,
    ) -> Result<Self, HarvestError> {
        Ok(normalize(collection, keep_columns, rename_map)?.with_name(name))
    }
}
