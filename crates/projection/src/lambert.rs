//! Lambert Conformal Conic projection.
//!
//! Common for regional weather model output. It maps a cone tangent or secant
//! to the Earth's surface onto a flat plane. Parameterized the way CF
//! conventions express it: one or two standard parallels, a central meridian
//! and a projection-origin latitude, with projected coordinates in meters.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Sphere radius used when the grid mapping carries no Earth radius (meters).
pub const DEFAULT_EARTH_RADIUS: f64 = 6371229.0;

/// Lambert Conformal Conic projection parameters.
///
/// Angles are stored in radians; constructors take degrees as they appear in
/// dataset metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertConformal {
    /// Central meridian in radians
    pub lon_0: f64,
    /// Latitude of projection origin in radians
    pub lat_0: f64,
    /// First standard parallel in radians
    pub latin1: f64,
    /// Second standard parallel in radians
    pub latin2: f64,
    /// Offset added to projected x (meters)
    pub false_easting: f64,
    /// Offset added to projected y (meters)
    pub false_northing: f64,
    /// Earth radius (meters)
    pub earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the projection origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from CF grid-mapping parameters (degrees).
    ///
    /// `standard_parallels` may repeat the same latitude for a tangent cone.
    pub fn from_cf(
        central_meridian_deg: f64,
        origin_latitude_deg: f64,
        standard_parallels: (f64, f64),
        false_easting: f64,
        false_northing: f64,
        earth_radius: f64,
    ) -> Self {
        let lon_0 = central_meridian_deg.to_radians();
        let lat_0 = origin_latitude_deg.to_radians();
        let latin1 = standard_parallels.0.to_radians();
        let latin2 = standard_parallels.1.to_radians();

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        // Compute F constant
        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;

        // Compute rho at the projection origin
        let rho0 = earth_radius * f / (PI / 4.0 + lat_0 / 2.0).tan().powf(n);

        Self {
            lon_0,
            lat_0,
            latin1,
            latin2,
            false_easting,
            false_northing,
            earth_radius,
            n,
            f,
            rho0,
        }
    }

    /// Project geographic coordinates (degrees) to planar meters.
    ///
    /// Returns `None` for the pole opposite the cone, where rho diverges.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lat_r = lat.to_radians();
        let lon_r = lon.to_radians();

        // The pole away from the standard parallels is unrepresentable
        if (self.n > 0.0 && lat <= -89.999) || (self.n < 0.0 && lat >= 89.999) {
            return None;
        }

        // Normalize longitude difference to [-pi, pi]
        let mut dlon = lon_r - self.lon_0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.earth_radius * self.f / (PI / 4.0 + lat_r / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;

        Some((x, y))
    }

    /// Convert planar meters back to geographic coordinates (degrees).
    pub fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let mut rho = x.hypot(self.rho0 - y);
        if self.n < 0.0 {
            rho = -rho;
        }
        if rho.abs() < 1e-12 {
            // Cone apex: the pole on the cone's side
            let pole = if self.n > 0.0 { 90.0 } else { -90.0 };
            return Some((self.lon_0.to_degrees(), pole));
        }

        let theta = if self.n < 0.0 {
            (-x).atan2(y - self.rho0)
        } else {
            x.atan2(self.rho0 - y)
        };

        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon_0 + theta / self.n;

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
