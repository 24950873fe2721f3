//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl LatLonBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Get the center point of the box as (lon, lat).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Check if a point is contained within this box.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Check if this box intersects another.
    pub fn intersects(&self, other: &LatLonBox) -> bool {
        !(self.max_lon < other.min_lon
            || self.min_lon > other.max_lon
            || self.max_lat < other.min_lat
            || self.min_lat > other.max_lat)
    }

    /// Expand the box by a buffer amount (in degrees) on every side.
    pub fn expand(&self, buffer: f64) -> Self {
        Self {
            min_lon: self.min_lon - buffer,
            min_lat: self.min_lat - buffer,
            max_lon: self.max_lon + buffer,
            max_lat: self.max_lat + buffer,
        }
    }

    /// Expand each side by a fraction of the box's own extent.
    ///
    /// A `pad_pct` of 0.1 grows the box by 10% of its width on the east and
    /// west sides and 10% of its height on the north and south sides.
    pub fn expand_fraction(&self, pad_pct: f64) -> Self {
        let pad_lon = pad_pct * self.width();
        let pad_lat = pad_pct * self.height();
        Self {
            min_lon: self.min_lon - pad_lon,
            min_lat: self.min_lat - pad_lat,
            max_lon: self.max_lon + pad_lon,
            max_lat: self.max_lat + pad_lat,
        }
    }

    /// Round the box outward to whole degrees.
    ///
    /// Minima are floored and maxima are ceiled so the snapped box always
    /// contains the original.
    pub fn snap_outward(&self) -> Self {
        Self {
            min_lon: self.min_lon.floor(),
            min_lat: self.min_lat.floor(),
            max_lon: self.max_lon.ceil(),
            max_lat: self.max_lat.ceil(),
        }
    }

    /// Clamp this box to valid geographic coordinates.
    pub fn clamp_to_valid(&self) -> Self {
        Self {
            min_lon: self.min_lon.max(-180.0).min(180.0),
            min_lat: self.min_lat.max(-90.0).min(90.0),
            max_lon: self.max_lon.max(-180.0).min(180.0),
            max_lat: self.max_lat.max(-90.0).min(90.0),
        }
    }

    /// Shift the box east by the given number of degrees of longitude.
    pub fn shift_lon(&self, offset: f64) -> Self {
        Self {
            min_lon: self.min_lon + offset,
            max_lon: self.max_lon + offset,
            ..*self
        }
    }
}

impl Default for LatLonBox {
    fn default() -> Self {
        // Global coverage
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_intersects() {
        let a = LatLonBox::new(0.0, 0.0, 10.0, 10.0);
        let b = LatLonBox::new(5.0, 5.0, 15.0, 15.0);
        let c = LatLonBox::new(20.0, 20.0, 30.0, 30.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn test_bbox_contains() {
        let bbox = LatLonBox::new(-100.0, 30.0, -90.0, 40.0);
        assert!(bbox.contains(-95.0, 35.0));
        assert!(!bbox.contains(-105.0, 35.0));
        assert!(!bbox.contains(-95.0, 45.0));
    }

    #[test]
    fn test_expand_fraction() {
        let bbox = LatLonBox::new(-60.0, 10.0, -50.0, 15.0);
        let padded = bbox.expand_fraction(0.1);

        assert!((padded.min_lon - (-61.0)).abs() < 1e-9);
        assert!((padded.max_lon - (-49.0)).abs() < 1e-9);
        assert!((padded.min_lat - 9.5).abs() < 1e-9);
        assert!((padded.max_lat - 15.5).abs() < 1e-9);
    }

    #[test]
    fn test_snap_outward_contains_original() {
        let bbox = LatLonBox::new(-56.3, 11.1, -53.7, 12.9);
        let snapped = bbox.snap_outward();

        assert_eq!(snapped.min_lon, -57.0);
        assert_eq!(snapped.max_lon, -53.0);
        assert_eq!(snapped.min_lat, 11.0);
        assert_eq!(snapped.max_lat, 13.0);
        assert!(snapped.contains(bbox.min_lon, bbox.min_lat));
        assert!(snapped.contains(bbox.max_lon, bbox.max_lat));
    }

    #[test]
    fn test_snap_outward_integer_bounds_unchanged() {
        let bbox = LatLonBox::new(-57.0, 11.0, -53.0, 13.0);
        let snapped = bbox.snap_outward();
        assert_eq!(snapped, bbox);
    }

    #[test]
    fn test_shift_lon() {
        let bbox = LatLonBox::new(-60.0, 10.0, -50.0, 15.0);
        let shifted = bbox.shift_lon(360.0);
        assert_eq!(shifted.min_lon, 300.0);
        assert_eq!(shifted.max_lon, 310.0);
        assert_eq!(shifted.min_lat, 10.0);
        assert_eq!(shifted.max_lat, 15.0);
    }
}
