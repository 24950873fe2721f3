//! Target domains for cropping and resampling.
//!
//! A domain describes the region a dataset should be cut down and regridded
//! to. [`LocalCartesianDomain`] is the common case: a flat tangent-plane
//! domain centered on a point of interest, with extents in meters, related to
//! geographic coordinates through an azimuthal equal-area projection.
//! [`CartesianDomain`] covers data that already lives on a plain x/y grid.

use serde::{Deserialize, Serialize};

use projection::{AzimuthalEqualArea, Crs};
use regrid_common::{LatLonBox, RegridError, Result};

/// A local flat-Earth domain centered on a geographic point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalCartesianDomain {
    /// Latitude of the domain center (degrees)
    pub central_latitude: f64,
    /// Longitude of the domain center (degrees)
    pub central_longitude: f64,
    /// East-west extent (meters)
    pub l_zonal: f64,
    /// North-south extent (meters)
    pub l_meridional: f64,
}

impl LocalCartesianDomain {
    /// Create a new domain, validating the parameters.
    pub fn new(
        central_latitude: f64,
        central_longitude: f64,
        l_zonal: f64,
        l_meridional: f64,
    ) -> Result<Self> {
        if !(-90.0..=90.0).contains(&central_latitude) {
            return Err(RegridError::ConfigError(format!(
                "central_latitude must be in [-90, 90], got {}",
                central_latitude
            )));
        }
        if l_zonal <= 0.0 || l_meridional <= 0.0 {
            return Err(RegridError::ConfigError(format!(
                "domain extents must be > 0, got {} x {}",
                l_zonal, l_meridional
            )));
        }
        Ok(Self {
            central_latitude,
            central_longitude,
            l_zonal,
            l_meridional,
        })
    }

    /// The projection relating domain meters to geographic coordinates.
    pub fn crs(&self) -> Crs {
        Crs::AzimuthalEqualArea(AzimuthalEqualArea::new(
            self.central_longitude,
            self.central_latitude,
        ))
    }

    /// Projected-meter extents as (min_x, min_y, max_x, max_y), centered on 0.
    pub fn spatial_bounds(&self) -> (f64, f64, f64, f64) {
        (
            -self.l_zonal / 2.0,
            -self.l_meridional / 2.0,
            self.l_zonal / 2.0,
            self.l_meridional / 2.0,
        )
    }

    /// Geographic bounding box enclosing the whole domain.
    ///
    /// The domain edges are curved in lat/lon, so corners alone can
    /// under-estimate the box; edge midpoints are sampled as well.
    pub fn latlon_bounds(&self) -> Result<LatLonBox> {
        let crs = self.crs();
        let (x_min, y_min, x_max, y_max) = self.spatial_bounds();
        let x_mid = 0.0;
        let y_mid = 0.0;

        let points = [
            // Corners
            (x_min, y_min),
            (x_max, y_min),
            (x_min, y_max),
            (x_max, y_max),
            // Edge midpoints
            (x_mid, y_min),
            (x_mid, y_max),
            (x_min, y_mid),
            (x_max, y_mid),
        ];

        let mut min_lon = f64::MAX;
        let mut max_lon = f64::MIN;
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;

        for (x, y) in points {
            let (lon, lat) = crs.unproject(x, y).ok_or_else(|| {
                RegridError::ConfigError(format!(
                    "domain extent {} x {} m does not fit the projection around ({}, {})",
                    self.l_zonal, self.l_meridional, self.central_longitude, self.central_latitude
                ))
            })?;
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }

        Ok(LatLonBox::new(min_lon, min_lat, max_lon, max_lat))
    }

    /// Build the regular output grid with spacing `dx` meters.
    ///
    /// The grid spans the full domain extent with `round(l / dx)` points per
    /// axis, and carries the geographic coordinates of every grid point.
    pub fn grid(&self, dx: f64) -> Result<TargetGrid> {
        let (nx, ny) = grid_shape(self.l_zonal, self.l_meridional, dx)?;

        let xs = linspace(-self.l_zonal / 2.0, self.l_zonal / 2.0, nx);
        let ys = linspace(-self.l_meridional / 2.0, self.l_meridional / 2.0, ny);

        let crs = self.crs();
        let mut lats = Vec::with_capacity(ny * nx);
        let mut lons = Vec::with_capacity(ny * nx);
        for &y in &ys {
            for &x in &xs {
                let (lon, lat) = crs.unproject(x, y).ok_or_else(|| {
                    RegridError::ConfigError(format!(
                        "grid point ({}, {}) m does not fit the projection",
                        x, y
                    ))
                })?;
                lons.push(lon);
                lats.push(lat);
            }
        }

        Ok(TargetGrid {
            xs,
            ys,
            lats: Some(lats),
            lons: Some(lons),
            crs: Some(crs),
        })
    }
}

/// A purely Cartesian domain for data already on an x/y grid in meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartesianDomain {
    /// x coordinate of the domain center (meters)
    pub x_c: f64,
    /// y coordinate of the domain center (meters)
    pub y_c: f64,
    /// East-west extent (meters)
    pub l_zonal: f64,
    /// North-south extent (meters)
    pub l_meridional: f64,
}

impl CartesianDomain {
    /// Create a new domain, validating the extents.
    pub fn new(x_c: f64, y_c: f64, l_zonal: f64, l_meridional: f64) -> Result<Self> {
        if l_zonal <= 0.0 || l_meridional <= 0.0 {
            return Err(RegridError::ConfigError(format!(
                "domain extents must be > 0, got {} x {}",
                l_zonal, l_meridional
            )));
        }
        Ok(Self {
            x_c,
            y_c,
            l_zonal,
            l_meridional,
        })
    }

    /// Projected-meter extents as (min_x, min_y, max_x, max_y).
    pub fn spatial_bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x_c - self.l_zonal / 2.0,
            self.y_c - self.l_meridional / 2.0,
            self.x_c + self.l_zonal / 2.0,
            self.y_c + self.l_meridional / 2.0,
        )
    }

    /// Build the regular output grid with spacing `dx` meters.
    ///
    /// Carries no geographic coordinates; a Cartesian domain has no
    /// projection attached.
    pub fn grid(&self, dx: f64) -> Result<TargetGrid> {
        let (nx, ny) = grid_shape(self.l_zonal, self.l_meridional, dx)?;

        Ok(TargetGrid {
            xs: linspace(
                self.x_c - self.l_zonal / 2.0,
                self.x_c + self.l_zonal / 2.0,
                nx,
            ),
            ys: linspace(
                self.y_c - self.l_meridional / 2.0,
                self.y_c + self.l_meridional / 2.0,
                ny,
            ),
            lats: None,
            lons: None,
            crs: None,
        })
    }
}

/// The regular grid a field is resampled onto.
#[derive(Debug, Clone)]
pub struct TargetGrid {
    /// x coordinates (meters), west to east
    pub xs: Vec<f64>,
    /// y coordinates (meters), south to north
    pub ys: Vec<f64>,
    /// Latitude of every grid point, row-major `(ny, nx)`
    pub lats: Option<Vec<f64>>,
    /// Longitude of every grid point, row-major `(ny, nx)`
    pub lons: Option<Vec<f64>>,
    /// Projection relating x/y to lat/lon, when the domain has one
    pub crs: Option<Crs>,
}

impl TargetGrid {
    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    /// Grid shape as `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.ys.len(), self.xs.len())
    }
}

fn grid_shape(l_zonal: f64, l_meridional: f64, dx: f64) -> Result<(usize, usize)> {
    if dx <= 0.0 {
        return Err(RegridError::ConfigError(format!(
            "grid spacing must be > 0, got {}",
            dx
        )));
    }
    let nx = (l_zonal / dx).round() as usize;
    let ny = (l_meridional / dx).round() as usize;
    if nx < 2 || ny < 2 {
        return Err(RegridError::ConfigError(format!(
            "grid spacing {} m too coarse for domain {} x {} m",
            dx, l_zonal, l_meridional
        )));
    }
    Ok((nx, ny))
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    // Endpoint exact regardless of step rounding
    values[n - 1] = stop;
    values
}
