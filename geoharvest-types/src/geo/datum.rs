/// Sphere the Web Mercator formulas are evaluated on.
///
/// Spherical Mercator ignores the flattening of the ellipsoid, so only the radius is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
}

impl Datum {
    /// Sphere with the WGS84 semimajor axis, 6 378 137 m.
    pub const WGS84: Self = Self::sphere(6_378_137.0);

    /// Sphere with the given radius in meters.
    pub const fn sphere(radius: f64) -> Self {
        Self { semimajor: radius }
    }

    /// Radius of the sphere in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}
