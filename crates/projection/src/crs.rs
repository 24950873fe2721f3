//! Coordinate reference system dispatch and projection errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regrid_common::RegridError;

use crate::azimuthal::AzimuthalEqualArea;
use crate::geostationary::Geostationary;
use crate::lambert::LambertConformal;

/// A coordinate reference system a dataset can be gridded in.
///
/// `project`/`unproject` convert between geographic degrees and the
/// projection's native coordinates: meters for the planar projections, scan
/// angle radians for geostationary, and degrees for the geographic identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Crs {
    /// Plain lat/lon (the identity mapping).
    Geographic,
    AzimuthalEqualArea(AzimuthalEqualArea),
    LambertConformal(LambertConformal),
    Geostationary(Geostationary),
}

impl Crs {
    /// Project geographic coordinates (degrees) into native coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match self {
            Crs::Geographic => Some((lon, lat)),
            Crs::AzimuthalEqualArea(p) => p.project(lon, lat),
            Crs::LambertConformal(p) => p.project(lon, lat),
            Crs::Geostationary(p) => p.from_geographic(lon, lat),
        }
    }

    /// Convert native coordinates back to geographic degrees as (lon, lat).
    pub fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            Crs::Geographic => Some((x, y)),
            Crs::AzimuthalEqualArea(p) => p.unproject(x, y),
            Crs::LambertConformal(p) => p.unproject(x, y),
            Crs::Geostationary(p) => p.to_geographic(x, y),
        }
    }

    /// The CF `grid_mapping_name` for this CRS.
    pub fn grid_mapping_name(&self) -> &'static str {
        match self {
            Crs::Geographic => "latitude_longitude",
            Crs::AzimuthalEqualArea(_) => "lambert_azimuthal_equal_area",
            Crs::LambertConformal(_) => "lambert_conformal_conic",
            Crs::Geostationary(_) => "geostationary",
        }
    }

    /// Meters per native coordinate unit, where the projection is not
    /// already in meters.
    ///
    /// Geostationary datasets sometimes store x/y as scan angles multiplied
    /// by the perspective point height; this factor converts between the two
    /// conventions. `None` means native coordinates are already meters (or
    /// degrees for the geographic identity).
    pub fn meters_per_native_unit(&self) -> Option<f64> {
        match self {
            Crs::Geostationary(p) => Some(p.perspective_point_height),
            _ => None,
        }
    }
}

/// Errors raised while interpreting projection metadata.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// The dataset carries no usable projection metadata.
    #[error("no projection information found in dataset")]
    NoProjectionInformation,

    /// The grid mapping variable named by `grid_mapping` is absent.
    #[error("grid mapping variable `{0}` not found in dataset")]
    MissingMappingVariable(String),

    /// The grid mapping names a projection this library does not implement.
    #[error("unsupported grid mapping: {0}")]
    UnsupportedGridMapping(String),

    /// A required projection parameter is missing.
    #[error("missing projection parameter: {0}")]
    MissingParameter(String),

    /// A projection parameter has an unusable value.
    #[error("invalid projection parameter `{name}`: {message}")]
    InvalidParameter { name: String, message: String },
}

impl From<ProjectionError> for RegridError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::NoProjectionInformation => RegridError::NoProjectionInformation,
            ProjectionError::UnsupportedGridMapping(name) => {
                RegridError::UnsupportedGridMapping(name)
            }
            other => RegridError::InvalidMetadata(other.to_string()),
        }
    }
}
