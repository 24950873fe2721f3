//! Geostationary satellite perspective projection.
//!
//! Converts between satellite scan angles (radians) and geographic
//! coordinates (lat/lon degrees). GOES-R style imagery uses the `x` sweep
//! axis; Meteosat-style imagery uses `y`.
//!
//! # Coordinate system
//!
//! The native coordinates are angular displacements from the satellite nadir.
//! Projected-meter coordinates, where a dataset uses them, are scan angles
//! multiplied by the perspective point height.

use serde::{Deserialize, Serialize};

/// Sweep angle axis of the scan geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepAxis {
    /// GOES-R convention.
    X,
    /// Meteosat convention.
    Y,
}

/// Geostationary projection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geostationary {
    /// Satellite height above the ellipsoid surface (meters)
    pub perspective_point_height: f64,
    /// Semi-major axis of the Earth ellipsoid (meters)
    pub semi_major_axis: f64,
    /// Semi-minor axis of the Earth ellipsoid (meters)
    pub semi_minor_axis: f64,
    /// Longitude of the satellite nadir point (degrees)
    pub longitude_origin: f64,
    /// Latitude of projection origin (always 0 for geostationary)
    pub latitude_origin: f64,
    /// Sweep angle axis
    pub sweep: SweepAxis,
}

impl Default for Geostationary {
    fn default() -> Self {
        // GOES-East values
        Self {
            perspective_point_height: 35786023.0,
            semi_major_axis: 6378137.0,
            semi_minor_axis: 6356752.31414,
            longitude_origin: -75.0,
            latitude_origin: 0.0,
            sweep: SweepAxis::X,
        }
    }
}

impl Geostationary {
    /// Create projection for GOES-16 (GOES-East at 75.2°W).
    pub fn goes16() -> Self {
        Self {
            longitude_origin: -75.2,
            ..Default::default()
        }
    }

    /// Create projection for GOES-18 (GOES-West at 137.2°W).
    pub fn goes18() -> Self {
        Self {
            longitude_origin: -137.2,
            ..Default::default()
        }
    }

    /// Distance from the Earth center to the satellite (meters).
    fn orbital_radius(&self) -> f64 {
        self.perspective_point_height + self.semi_major_axis
    }

    /// Convert scan angles (radians) to geographic coordinates (degrees).
    ///
    /// Returns `None` if the scan angle points past the Earth's limb.
    pub fn to_geographic(&self, x_rad: f64, y_rad: f64) -> Option<(f64, f64)> {
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        let lambda_0 = self.longitude_origin.to_radians();
        let h_total = self.orbital_radius();

        // Unit view-ray components in the satellite frame: u points from the
        // satellite toward the Earth center, v east, w north.
        let (u, v, w) = match self.sweep {
            SweepAxis::X => (
                x_rad.cos() * y_rad.cos(),
                -x_rad.sin(),
                x_rad.cos() * y_rad.sin(),
            ),
            SweepAxis::Y => (
                y_rad.cos() * x_rad.cos(),
                -y_rad.cos() * x_rad.sin(),
                y_rad.sin(),
            ),
        };

        // Quadratic for the distance to the Earth surface along the ray
        let a = u * u + v * v + (req / rpol).powi(2) * w * w;
        let b = -2.0 * h_total * u;
        let c = h_total * h_total - req * req;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None; // Scan angle points to space
        }

        let rs = (-b - discriminant.sqrt()) / (2.0 * a);

        let sx = rs * u;
        let sy = rs * v;
        let sz = rs * w;

        // Convert to geodetic coordinates
        let lat = ((req / rpol).powi(2) * sz / (h_total - sx).hypot(sy)).atan();
        let lon = lambda_0 - sy.atan2(h_total - sx);

        Some((lon.to_degrees(), lat.to_degrees()))
    }

    /// Convert geographic coordinates (degrees) to scan angles (radians).
    ///
    /// Returns `None` if the point is not visible from the satellite.
    pub fn from_geographic(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        let lambda_0 = self.longitude_origin.to_radians();
        let h_total = self.orbital_radius();

        let lat_rad = lat.to_radians();
        let lon_rad = lon.to_radians();

        // Geocentric latitude (accounting for Earth's oblateness)
        let phi_c = ((rpol / req).powi(2) * lat_rad.tan()).atan();

        // Radius from Earth center to surface point
        let e2 = 1.0 - (rpol / req).powi(2);
        let rc = rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        // Earth-centered component toward the satellite
        let x_earth = rc * phi_c.cos() * (lon_rad - lambda_0).cos();

        // Horizon test: the point must be on the satellite-facing cap,
        // i.e. its view ray must not pass through the Earth first
        if x_earth * h_total < rc * rc {
            return None;
        }

        // Satellite-frame components of the surface point
        let sx = h_total - x_earth;
        let sy = -rc * phi_c.cos() * (lon_rad - lambda_0).sin();
        let sz = rc * phi_c.sin();

        let rs = (sx * sx + sy * sy + sz * sz).sqrt();

        match self.sweep {
            SweepAxis::X => {
                let x_rad = (-sy / rs).asin();
                let y_rad = sz.atan2(sx);
                Some((x_rad, y_rad))
            }
            SweepAxis::Y => {
                let y_rad = (sz / rs).asin();
                let x_rad = (-sy).atan2(sx);
                Some((x_rad, y_rad))
            }
        }
    }
}
