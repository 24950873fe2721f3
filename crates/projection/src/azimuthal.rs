//! Lambert azimuthal equal-area projection (spherical form).
//!
//! This is the projection behind local Cartesian domains: a tangent plane
//! centered on a point of interest, with distances in meters that are
//! area-true near the center. Satellite tiling pipelines conventionally use
//! it with a spherical Earth of radius 6371228 m.

use serde::{Deserialize, Serialize};

/// Sphere radius used when no explicit Earth radius is given (meters).
pub const DEFAULT_SPHERE_RADIUS: f64 = 6371228.0;

/// Lambert azimuthal equal-area projection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzimuthalEqualArea {
    /// Longitude of the projection center (degrees)
    pub lon_0: f64,
    /// Latitude of the projection center (degrees)
    pub lat_0: f64,
    /// Sphere radius (meters)
    pub earth_radius: f64,
    /// Offset added to projected x (meters)
    pub false_easting: f64,
    /// Offset added to projected y (meters)
    pub false_northing: f64,
}

impl AzimuthalEqualArea {
    /// Create a projection centered on (lon_0, lat_0) with the default sphere.
    pub fn new(lon_0: f64, lat_0: f64) -> Self {
        Self {
            lon_0,
            lat_0,
            earth_radius: DEFAULT_SPHERE_RADIUS,
            false_easting: 0.0,
            false_northing: 0.0,
        }
    }

    /// Override the sphere radius (meters).
    pub fn with_radius(mut self, earth_radius: f64) -> Self {
        self.earth_radius = earth_radius;
        self
    }

    /// Project geographic coordinates (degrees) to planar meters.
    ///
    /// Returns `None` for the antipode of the projection center, where the
    /// projection is undefined.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lat_r = lat.to_radians();
        let lat0_r = self.lat_0.to_radians();
        let dlon = (lon - self.lon_0).to_radians();

        let cos_c = lat0_r.sin() * lat_r.sin() + lat0_r.cos() * lat_r.cos() * dlon.cos();
        let denom = 1.0 + cos_c;
        if denom < 1e-12 {
            return None; // Antipodal point
        }

        let k = (2.0 / denom).sqrt();
        let x = self.earth_radius * k * lat_r.cos() * dlon.sin();
        let y = self.earth_radius
            * k
            * (lat0_r.cos() * lat_r.sin() - lat0_r.sin() * lat_r.cos() * dlon.cos());

        Some((x + self.false_easting, y + self.false_northing))
    }

    /// Convert planar meters back to geographic coordinates (degrees).
    ///
    /// Returns `None` for points outside the projection disk.
    pub fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rho = x.hypot(y);

        if rho < 1e-9 {
            return Some((self.lon_0, self.lat_0));
        }

        let ratio = rho / (2.0 * self.earth_radius);
        if ratio > 1.0 {
            return None; // Beyond the projection disk
        }

        let c = 2.0 * ratio.asin();
        let lat0_r = self.lat_0.to_radians();

        let lat = (c.cos() * lat0_r.sin() + y * c.sin() * lat0_r.cos() / rho).asin();
        let lon = self.lon_0.to_radians()
            + (x * c.sin()).atan2(rho * lat0_r.cos() * c.cos() - y * lat0_r.sin() * c.sin());

        let mut lon_deg = lon.to_degrees();
        while lon_deg > 180.0 {
            lon_deg -= 360.0;
        }
        while lon_deg < -180.0 {
            lon_deg += 360.0;
        }

        Some((lon_deg, lat.to_degrees()))
    }
}
