//! [`TabularLayer`] is the tabular form of a WFS layer: one row per feature with the geometry and a fixed set of
//! named attribute columns.

use geojson::Geometry;
use serde_json::Value;

use crate::error::HarvestError;

mod export;
pub mod loader;
mod normalize;
mod projection;

pub use normalize::normalize;
pub use projection::{bulk_to_mercator, X_COLUMN, Y_COLUMN};

/// Name of the geometry column in exported data.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// One row of a [`TabularLayer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    geometry: Option<Geometry>,
    values: Vec<Value>,
}

impl Row {
    /// Geometry of the row. Features without geometry produce `None`.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Attribute values in the order of the layer columns.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Ordered rows of geometry plus named attribute columns, labeled with a name for downstream addressing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularLayer {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TabularLayer {
    /// Creates an empty layer with the given attribute columns.
    ///
    /// Column names must be unique and must not clash with the [`GEOMETRY_COLUMN`].
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self, HarvestError> {
        for (index, column) in columns.iter().enumerate() {
            if column == GEOMETRY_COLUMN {
                return Err(HarvestError::Schema(format!(
                    "attribute column cannot be named {GEOMETRY_COLUMN}"
                )));
            }

            if columns[..index].contains(column) {
                return Err(HarvestError::Schema(format!(
                    "duplicate column {column}"
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            columns,
            rows: vec![],
        })
    }

    /// Label of the layer, e.g. the target table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the label of the layer.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Attribute column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the column among the attribute columns.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Rows of the layer.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the layer has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. The number of values must match the number of columns.
    pub fn push_row(
        &mut self,
        geometry: Option<Geometry>,
        values: Vec<Value>,
    ) -> Result<(), HarvestError> {
        if values.len() != self.columns.len() {
            return Err(HarvestError::Schema(format!(
                "row has {} values, layer {} has {} columns",
                values.len(),
                self.name,
                self.columns.len()
            )));
        }

        self.rows.push(Row { geometry, values });
        Ok(())
    }

    /// Value of the given column in the given row.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.values.get(index)
    }

    /// Iterates over the values of one column.
    pub fn column(&self, column: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| &row.values[index]))
    }

    /// Adds a column, or overwrites it if a column with this name already exists.
    fn set_column(&mut self, column: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());

        let index = match self.column_index(column) {
            Some(index) => index,
            None => {
                self.columns.push(column.to_string());
                self.columns.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            if index < row.values.len() {
                row.values[index] = value;
            } else {
                row.values.push(value);
            }
        }
    }

    fn map_geometries<F>(&self, mut f: F) -> Result<Self, HarvestError>
    where
        F: FnMut(usize, &Geometry) -> Result<Geometry, HarvestError>,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                Ok(Row {
                    geometry: row.geometry.as_ref().map(|g| f(index, g)).transpose()?,
                    values: row.values.clone(),
                })
            })
            .collect::<Result<Vec<_>, HarvestError>>()?;

        Ok(Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geojson::Value as GeoValue;
    use serde_json::json;

    #[test]
    fn column_names_are_checked() {
        assert_matches!(
            TabularLayer::new("t", vec!["a".into(), "a".into()]),
            Err(HarvestError::Schema(_))
        );
        assert_matches!(
            TabularLayer::new("t", vec!["geometry".into()]),
            Err(HarvestError::Schema(_))
        );
    }

    #[test]
    fn rows_and_columns() {
        let mut layer = TabularLayer::new("buurt", vec!["b_id".into(), "b_name".into()]).unwrap();
        layer
            .push_row(
                Some(Geometry::new(GeoValue::Point(vec![1.0, 2.0]))),
                vec![json!(1), json!("Kinkerbuurt")],
            )
            .unwrap();
        layer.push_row(None, vec![json!(2), json!("Jordaan")]).unwrap();

        assert_eq!(layer.len(), 2);
        assert_eq!(layer.value(1, "b_name"), Some(&json!("Jordaan")));
        assert_eq!(layer.value(2, "b_name"), None);
        assert_eq!(layer.value(0, "missing"), None);
        assert!(layer.rows()[1].geometry().is_none());

        let ids: Vec<_> = layer.column("b_id").unwrap().collect();
        assert_eq!(ids, [&json!(1), &json!(2)]);

        assert_matches!(
            layer.push_row(None, vec![json!(3)]),
            Err(HarvestError::Schema(_))
        );
    }

    #[test]
    fn set_column_adds_and_overwrites() {
        let mut layer = TabularLayer::new("t", vec!["a".into()]).unwrap();
        layer.push_row(None, vec![json!(1)]).unwrap();

        layer.set_column("b", vec![json!(2)]);
        layer.set_column("a", vec![json!(3)]);

        assert_eq!(layer.columns(), ["a", "b"]);
        assert_eq!(layer.rows()[0].values(), [json!(3), json!(2)]);
    }
}
