use geoharvest_types::error::TypesError;
use geoharvest_types::geo::impls::projection::SphericalMercator;
use geoharvest_types::geo::Projection;
use geoharvest_types::geojson::{project_geometry, PositionPoint};
use serde_json::Value;

use crate::error::HarvestError;
use crate::layer::TabularLayer;

/// Name of the easting column written by [`bulk_to_mercator`].
pub const X_COLUMN: &str = "x";
/// Name of the northing column written by [`bulk_to_mercator`].
pub const Y_COLUMN: &str = "y";

/// Adds (or overwrites) `x` and `y` columns with Web Mercator coordinates computed from the longitude and latitude
/// columns of every row.
///
/// The whole call fails if any row cannot be projected: a latitude of ±90 degrees or more, or a non-finite result,
/// is reported as [`HarvestError::CoordinateDomain`] with the index of the row. Missing or non-numeric coordinate
/// values are reported as [`HarvestError::Schema`].
pub fn bulk_to_mercator(
    layer: &TabularLayer,
    lon_column: &str,
    lat_column: &str,
    projection: &SphericalMercator,
) -> Result<TabularLayer, HarvestError> {
    let lon_index = column_index(layer, lon_column)?;
    let lat_index = column_index(layer, lat_column)?;

    let mut xs = Vec::with_capacity(layer.len());
    let mut ys = Vec::with_capacity(layer.len());
    for (row, record) in layer.rows().iter().enumerate() {
        let lon = number(&record.values()[lon_index], row, lon_column)?;
        let lat = number(&record.values()[lat_index], row, lat_column)?;

        let (x, y) = projection.bulk_formula(lon, lat);
        if lat.abs() >= 90.0 || !x.is_finite() || !y.is_finite() {
            return Err(HarvestError::CoordinateDomain {
                row,
                source: TypesError::CoordinateDomain { x: lon, y: lat },
            });
        }

        xs.push(Value::from(x));
        ys.push(Value::from(y));
    }

    let mut result = layer.clone();
    result.set_column(X_COLUMN, xs);
    result.set_column(Y_COLUMN, ys);

    Ok(result)
}

impl TabularLayer {
    /// Projects the geometry of every row with the given projection.
    ///
    /// Fails on the first geometry that cannot be projected, so the result never contains partially projected data.
    pub fn reproject<P>(&self, projection: &P) -> Result<TabularLayer, HarvestError>
    where
        P: Projection + ?Sized,
        P::InPoint: PositionPoint,
        P::OutPoint: PositionPoint,
    {
        self.map_geometries(|row, geometry| {
            project_geometry(geometry, projection)
                .map_err(|source| HarvestError::CoordinateDomain { row, source })
        })
    }
}

fn column_index(layer: &TabularLayer, column: &str) -> Result<usize, HarvestError> {
    layer.column_index(column).ok_or_else(|| {
        HarvestError::Schema(format!("layer {} has no column {column}", layer.name()))
    })
}

fn number(value: &Value, row: usize, column: &str) -> Result<f64, HarvestError> {
    value.as_f64().ok_or_else(|| {
        HarvestError::Schema(format!(
            "row {row}: value {value} of column {column} is not a number"
        ))
    })
}
