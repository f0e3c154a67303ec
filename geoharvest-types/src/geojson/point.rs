use geojson::Position;

use crate::cartesian::Point2d;
use crate::error::TypesError;
use crate::geo::impls::GeoPoint2d;
use crate::geo::{GeoPoint, NewGeoPoint};

/// Point type that can be read from and written into a GeoJSON position.
///
/// Positions keep their extra dimensions (e.g. elevation) untouched when a point is written back.
pub trait PositionPoint: Sized {
    /// Reads the first two dimensions of the position.
    fn from_position(position: &Position) -> Result<Self, TypesError>;
    /// Writes the point into the first two dimensions of the position.
    fn write_position(&self, position: &mut Position);
}

fn first_two(position: &Position) -> Result<(f64, f64), TypesError> {
    if position.len() < 2 {
        Err(TypesError::Conversion(
            "point must contain at least 2 dimensions".to_string(),
        ))
    } else {
        Ok((position[0], position[1]))
    }
}

impl PositionPoint for GeoPoint2d {
    fn from_position(position: &Position) -> Result<Self, TypesError> {
        let (lon, lat) = first_two(position)?;
        Ok(GeoPoint2d::lonlat(lon, lat))
    }

    fn write_position(&self, position: &mut Position) {
        position[0] = self.lon();
        position[1] = self.lat();
    }
}

impl PositionPoint for Point2d {
    fn from_position(position: &Position) -> Result<Self, TypesError> {
        let (x, y) = first_two(position)?;
        Ok(Point2d::new(x, y))
    }

    fn write_position(&self, position: &mut Position) {
        position[0] = self.x;
        position[1] = self.y;
    }
}
