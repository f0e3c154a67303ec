//! Re-projection of GeoJSON geometries.

use geojson::{Geometry, Position, Value};

use crate::error::TypesError;
use crate::geo::Projection;

mod point;

pub use point::PositionPoint;

/// Projects every position of the geometry with the given projection.
///
/// Fails with [`TypesError::CoordinateDomain`] on the first position the projection rejects. Bounding boxes are
/// dropped from the result since they are no longer valid in the target system.
pub fn project_geometry<P>(geometry: &Geometry, projection: &P) -> Result<Geometry, TypesError>
where
    P: Projection + ?Sized,
    P::InPoint: PositionPoint,
    P::OutPoint: PositionPoint,
{
    map_geometry(geometry, &|position| {
        let point = <P::InPoint as PositionPoint>::from_position(position)?;
        let projected = projection
            .project(&point)
            .ok_or_else(|| domain_error(position))?;
        let mut result = position.clone();
        projected.write_position(&mut result);
        Ok(result)
    })
}

/// Converts every position of the geometry back into the source system of the projection.
pub fn unproject_geometry<P>(geometry: &Geometry, projection: &P) -> Result<Geometry, TypesError>
where
    P: Projection + ?Sized,
    P::InPoint: PositionPoint,
    P::OutPoint: PositionPoint,
{
    map_geometry(geometry, &|position| {
        let point = <P::OutPoint as PositionPoint>::from_position(position)?;
        let unprojected = projection
            .unproject(&point)
            .ok_or_else(|| domain_error(position))?;
        let mut result = position.clone();
        unprojected.write_position(&mut result);
        Ok(result)
    })
}

fn domain_error(position: &Position) -> TypesError {
    TypesError::CoordinateDomain {
        x: position.first().copied().unwrap_or(f64::NAN),
        y: position.get(1).copied().unwrap_or(f64::NAN),
    }
}

type PositionFn<'a> = dyn Fn(&Position) -> Result<Position, TypesError> + 'a;

fn map_geometry(geometry: &Geometry, f: &PositionFn) -> Result<Geometry, TypesError> {
    let value = match &geometry.value {
        Value::Point(p) => Value::Point(f(p)?),
        Value::MultiPoint(points) => Value::MultiPoint(map_positions(points, f)?),
        Value::LineString(points) => Value::LineString(map_positions(points, f)?),
        Value::MultiLineString(lines) => Value::MultiLineString(map_rings(lines, f)?),
        Value::Polygon(rings) => Value::Polygon(map_rings(rings, f)?),
        Value::MultiPolygon(polygons) => Value::MultiPolygon(
            polygons
                .iter()
                .map(|rings| map_rings(rings, f))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::GeometryCollection(geometries) => Value::GeometryCollection(
            geometries
                .iter()
                .map(|g| map_geometry(g, f))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(Geometry {
        bbox: None,
        value,
        foreign_members: geometry.foreign_members.clone(),
    })
}

fn map_positions(points: &[Position], f: &PositionFn) -> Result<Vec<Position>, TypesError> {
    points.iter().map(f).collect()
}

fn map_rings(rings: &[Vec<Position>], f: &PositionFn) -> Result<Vec<Vec<Position>>, TypesError> {
    rings.iter().map(|ring| map_positions(ring, f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::impls::projection::SphericalMercator;
    use crate::geo::InvertedProjection;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn project_polygon() {
        let polygon = Geometry::new(Value::Polygon(vec![vec![
            vec![4.8, 52.3],
            vec![4.9, 52.3],
            vec![4.9, 52.4, 1.5],
            vec![4.8, 52.3],
        ]]));

        let projected = project_geometry(&polygon, &SphericalMercator::WGS84).unwrap();
        let Value::Polygon(rings) = &projected.value else {
            panic!("expected polygon, got {:?}", projected.value);
        };

        assert_eq!(rings[0].len(), 4);
        assert_abs_diff_eq!(rings[0][0][0], 534333.556, epsilon = 1e-3);
        assert_eq!(rings[0][2][2], 1.5);

        let restored = unproject_geometry(&projected, &SphericalMercator::WGS84).unwrap();
        let Value::Polygon(rings) = &restored.value else {
            panic!("expected polygon, got {:?}", restored.value);
        };
        assert_abs_diff_eq!(rings[0][1][0], 4.9, epsilon = 1e-9);
        assert_abs_diff_eq!(rings[0][1][1], 52.3, epsilon = 1e-9);
    }

    #[test]
    fn inverted_projection() {
        let point = Geometry::new(Value::Point(vec![534333.5558077131, 6853743.0]));
        let unprojected =
            project_geometry(&point, &InvertedProjection::new(SphericalMercator::WGS84)).unwrap();
        let Value::Point(position) = unprojected.value else {
            panic!("expected point");
        };

        assert_abs_diff_eq!(position[0], 4.8, epsilon = 1e-6);
    }

    #[test]
    fn rejected_position_fails_whole_geometry() {
        let line = Geometry::new(Value::LineString(vec![vec![4.8, 52.3], vec![0.0, 90.0]]));
        assert_matches!(
            project_geometry(&line, &SphericalMercator::WGS84),
            Err(TypesError::CoordinateDomain { x, y }) if x == 0.0 && y == 90.0
        );
    }

    #[test]
    fn short_position() {
        let point = Geometry::new(Value::Point(vec![4.8]));
        assert_matches!(
            project_geometry(&point, &SphericalMercator::WGS84),
            Err(TypesError::Conversion(_))
        );
    }
}
