use std::io::Write;

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::Value;

use crate::error::HarvestError;
use crate::layer::{TabularLayer, GEOMETRY_COLUMN};

impl TabularLayer {
    /// Builds a GeoJSON feature collection with the given attribute columns as feature properties.
    pub fn to_feature_collection(
        &self,
        properties: &[&str],
    ) -> Result<FeatureCollection, HarvestError> {
        let indices = properties
            .iter()
            .map(|column| {
                self.column_index(column).ok_or_else(|| {
                    HarvestError::Schema(format!("layer {} has no column {column}", self.name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let features = self
            .rows
            .iter()
            .map(|row| {
                let properties: JsonObject = properties
                    .iter()
                    .zip(&indices)
                    .map(|(column, index)| (column.to_string(), row.values[*index].clone()))
                    .collect();

                Feature {
                    bbox: None,
                    geometry: row.geometry.clone(),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    /// Writes the layer as CSV: the index column, every attribute column and the geometry as GeoJSON text.
    ///
    /// Strings are written without quotes added by JSON serialization, `null` values and missing geometries as
    /// empty fields.
    pub fn write_csv<W: Write>(&self, writer: W, index_column: &str) -> Result<(), HarvestError> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 2);
        header.push(index_column);
        header.extend(self.columns.iter().map(String::as_str));
        header.push(GEOMETRY_COLUMN);
        csv.write_record(&header)?;

        for (index, row) in self.rows.iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(index.to_string());
            record.extend(row.values.iter().map(csv_field));
            record.push(match &row.geometry {
                Some(geometry) => serde_json::to_string(geometry)?,
                None => String::new(),
            });
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
