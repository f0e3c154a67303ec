use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Kind of the projection a CRS applies to geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Plain longitude/latitude in degrees.
    None,
    /// Spherical Web Mercator.
    WebMercator,
    /// Any other projected system. Coordinates are in meters.
    Other,
}

/// Coordinate reference system identified by its EPSG code.
///
/// Only codes present in the built-in registry can be constructed with [`Crs::from_epsg`], so a `Crs` value always
/// refers to a system the service and the projection code know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Crs {
    epsg: u32,
}

struct RegistryEntry {
    epsg: u32,
    name: &'static str,
    projection_type: ProjectionType,
}

const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        epsg: 4326,
        name: "WGS 84",
        projection_type: ProjectionType::None,
    },
    RegistryEntry {
        epsg: 4258,
        name: "ETRS89",
        projection_type: ProjectionType::None,
    },
    RegistryEntry {
        epsg: 3857,
        name: "WGS 84 / Pseudo-Mercator",
        projection_type: ProjectionType::WebMercator,
    },
    RegistryEntry {
        epsg: 900913,
        name: "Google Maps Global Mercator",
        projection_type: ProjectionType::WebMercator,
    },
    RegistryEntry {
        epsg: 28992,
        name: "Amersfoort / RD New",
        projection_type: ProjectionType::Other,
    },
    RegistryEntry {
        epsg: 3035,
        name: "ETRS89-extended / LAEA Europe",
        projection_type: ProjectionType::Other,
    },
    RegistryEntry {
        epsg: 25831,
        name: "ETRS89 / UTM zone 31N",
        projection_type: ProjectionType::Other,
    },
    RegistryEntry {
        epsg: 25832,
        name: "ETRS89 / UTM zone 32N",
        projection_type: ProjectionType::Other,
    },
    RegistryEntry {
        epsg: 32631,
        name: "WGS 84 / UTM zone 31N",
        projection_type: ProjectionType::Other,
    },
    RegistryEntry {
        epsg: 32632,
        name: "WGS 84 / UTM zone 32N",
        projection_type: ProjectionType::Other,
    },
];

impl Crs {
    /// Geographic WGS84 (longitude/latitude in degrees).
    pub const WGS84: Crs = Crs { epsg: 4326 };
    /// Spherical Web Mercator.
    pub const EPSG3857: Crs = Crs { epsg: 3857 };
    /// Dutch national grid, used by most Amsterdam services.
    pub const RD_NEW: Crs = Crs { epsg: 28992 };

    /// Looks up the code in the registry.
    pub fn from_epsg(epsg: u32) -> Result<Self, TypesError> {
        Self::entry(epsg)
            .map(|_| Self { epsg })
            .ok_or(TypesError::UnknownEpsg(epsg))
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Human readable name of the system.
    pub fn name(&self) -> &'static str {
        Self::entry(self.epsg).map(|e| e.name).unwrap_or("unknown")
    }

    /// Projection used by the system.
    pub fn projection_type(&self) -> ProjectionType {
        Self::entry(self.epsg)
            .map(|e| e.projection_type)
            .unwrap_or(ProjectionType::Other)
    }

    /// Value for the `SRSNAME` request parameter, e.g. `EPSG:28992`.
    pub fn srs_name(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    fn entry(epsg: u32) -> Option<&'static RegistryEntry> {
        REGISTRY.iter().find(|e| e.epsg == epsg)
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

impl TryFrom<u32> for Crs {
    type Error = TypesError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_epsg(value)
    }
}

impl From<Crs> for u32 {
    fn from(value: Crs) -> Self {
        value.epsg
    }
}
