//! The regridding engine seam and the built-in engine.
//!
//! Resampling is delegated through [`RegridEngine`], a single-method
//! contract: given a source grid, a target grid and a method, produce the
//! resampled values. The built-in engine covers source grids whose
//! geographic-to-index mapping can be inverted directly; an external engine
//! (ESMF-class weights, for instance) can be plugged in behind the same
//! trait.

use rayon::prelude::*;

use projection::Crs;
use regrid_common::{InterpolationMethod, RegridError, Result};

use crate::domain::TargetGrid;
use crate::kernels;

/// How a source grid's geography is expressed.
#[derive(Debug, Clone)]
pub enum SourceGeometry {
    /// 1D lat/lon axes aligned with the grid rows/columns.
    Aligned { lats: Vec<f64>, lons: Vec<f64> },
    /// 2D lat/lon per grid point, row-major `(ny, nx)`.
    Curvilinear { lats: Vec<f64>, lons: Vec<f64> },
    /// 1D projection axes plus the projection relating them to lat/lon.
    Projected {
        xs: Vec<f64>,
        ys: Vec<f64>,
        crs: Crs,
    },
    /// 1D x/y axes in the same Cartesian frame as the target grid.
    Cartesian { xs: Vec<f64>, ys: Vec<f64> },
}

/// A source grid handed to a regridding engine: data plus geometry.
#[derive(Debug)]
pub struct SourceGrid<'a> {
    /// Values in row-major `(ny, nx)` order.
    pub data: &'a [f32],
    pub ny: usize,
    pub nx: usize,
    pub geometry: SourceGeometry,
}

impl SourceGrid<'_> {
    fn validate(&self) -> Result<()> {
        if self.data.len() != self.ny * self.nx {
            return Err(RegridError::shape_mismatch(
                format!("{} ({} x {})", self.ny * self.nx, self.ny, self.nx),
                self.data.len().to_string(),
            ));
        }

        let (y_len, x_len) = match &self.geometry {
            SourceGeometry::Aligned { lats, lons } => (lats.len(), lons.len()),
            SourceGeometry::Curvilinear { lats, lons } => {
                if lats.len() != self.ny * self.nx || lons.len() != self.ny * self.nx {
                    return Err(RegridError::shape_mismatch(
                        format!("{} 2D coordinate values", self.ny * self.nx),
                        format!("{} lat / {} lon", lats.len(), lons.len()),
                    ));
                }
                return Ok(());
            }
            SourceGeometry::Projected { xs, ys, .. } => (ys.len(), xs.len()),
            SourceGeometry::Cartesian { xs, ys } => (ys.len(), xs.len()),
        };

        if y_len != self.ny || x_len != self.nx {
            return Err(RegridError::shape_mismatch(
                format!("axes ({}, {})", self.ny, self.nx),
                format!("({}, {})", y_len, x_len),
            ));
        }
        Ok(())
    }
}

/// The external-collaborator contract for numerical resampling.
pub trait RegridEngine {
    /// Resample `source` onto `target`, returning row-major values of the
    /// target's shape. Target points outside the source grid are NaN.
    fn resample(
        &self,
        source: &SourceGrid<'_>,
        target: &TargetGrid,
        method: InterpolationMethod,
    ) -> Result<Vec<f32>>;
}

/// The in-workspace regridding engine.
///
/// Inverts the source geometry per target point and samples with the
/// selected kernel. Curvilinear sources have no closed-form inverse, so only
/// nearest neighbor is supported for them; aligned, projected and Cartesian
/// sources support every method.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl RegridEngine for BuiltinEngine {
    fn resample(
        &self,
        source: &SourceGrid<'_>,
        target: &TargetGrid,
        method: InterpolationMethod,
    ) -> Result<Vec<f32>> {
        source.validate()?;

        let (tny, tnx) = target.shape();
        tracing::debug!(
            source_shape = ?(source.ny, source.nx),
            target_shape = ?(tny, tnx),
            %method,
            "resampling"
        );

        let mut output = vec![f32::NAN; tny * tnx];

        match &source.geometry {
            SourceGeometry::Cartesian { xs, ys } => {
                output
                    .par_chunks_mut(tnx)
                    .enumerate()
                    .for_each(|(row, out_row)| {
                        let fj = fractional_index(ys, target.ys[row]);
                        for (col, out) in out_row.iter_mut().enumerate() {
                            if let (Some(fj), Some(fi)) =
                                (fj, fractional_index(xs, target.xs[col]))
                            {
                                *out = sample(source, fi, fj, method);
                            }
                        }
                    });
            }
            SourceGeometry::Aligned { lats, lons } => {
                let (tlats, tlons) = target_latlon(target)?;
                output
                    .par_chunks_mut(tnx)
                    .enumerate()
                    .for_each(|(row, out_row)| {
                        for (col, out) in out_row.iter_mut().enumerate() {
                            let idx = row * tnx + col;
                            if let (Some(fj), Some(fi)) = (
                                fractional_index(lats, tlats[idx]),
                                fractional_index(lons, tlons[idx]),
                            ) {
                                *out = sample(source, fi, fj, method);
                            }
                        }
                    });
            }
            SourceGeometry::Projected { xs, ys, crs } => {
                let (tlats, tlons) = target_latlon(target)?;
                output
                    .par_chunks_mut(tnx)
                    .enumerate()
                    .for_each(|(row, out_row)| {
                        for (col, out) in out_row.iter_mut().enumerate() {
                            let idx = row * tnx + col;
                            let Some((x, y)) = crs.project(tlons[idx], tlats[idx]) else {
                                continue;
                            };
                            if let (Some(fj), Some(fi)) =
                                (fractional_index(ys, y), fractional_index(xs, x))
                            {
                                *out = sample(source, fi, fj, method);
                            }
                        }
                    });
            }
            SourceGeometry::Curvilinear { lats, lons } => {
                if method != InterpolationMethod::Nearest {
                    return Err(RegridError::engine_error(format!(
                        "{} resampling from a curvilinear source grid requires an external \
                         regridding engine; the built-in engine supports nearest only",
                        method
                    )));
                }
                let (tlats, tlons) = target_latlon(target)?;
                output
                    .par_chunks_mut(tnx)
                    .enumerate()
                    .for_each(|(row, out_row)| {
                        for (col, out) in out_row.iter_mut().enumerate() {
                            let idx = row * tnx + col;
                            if let Some(k) =
                                nearest_source_point(lats, lons, tlats[idx], tlons[idx])
                            {
                                *out = source.data[k];
                            }
                        }
                    });
            }
        }

        Ok(output)
    }
}

fn sample(source: &SourceGrid<'_>, fi: f64, fj: f64, method: InterpolationMethod) -> f32 {
    match method {
        InterpolationMethod::Nearest => {
            kernels::nearest_sample(source.data, source.nx, source.ny, fi, fj)
        }
        InterpolationMethod::Bilinear => {
            kernels::bilinear_sample(source.data, source.nx, source.ny, fi, fj)
        }
        InterpolationMethod::Cubic => {
            kernels::cubic_sample(source.data, source.nx, source.ny, fi, fj)
        }
    }
}

fn target_latlon(target: &TargetGrid) -> Result<(&[f64], &[f64])> {
    match (&target.lats, &target.lons) {
        (Some(lats), Some(lons)) => Ok((lats, lons)),
        _ => Err(RegridError::engine_error(
            "target grid carries no lat/lon coordinates; a geographic source \
             cannot be resampled onto a bare Cartesian grid",
        )),
    }
}

/// Fractional index of a value on a monotonic axis.
///
/// Works for ascending and descending axes; `None` outside the axis range.
fn fractional_index(axis: &[f64], v: f64) -> Option<f64> {
    if axis.len() < 2 || !v.is_finite() {
        return None;
    }
    let last = axis.len() - 1;
    let ascending = axis[0] <= axis[last];
    let (lo_val, hi_val) = if ascending {
        (axis[0], axis[last])
    } else {
        (axis[last], axis[0])
    };
    if v < lo_val || v > hi_val {
        return None;
    }

    let mut lo = 0usize;
    let mut hi = last;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if (v >= axis[mid]) == ascending {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let denom = axis[lo + 1] - axis[lo];
    if denom.abs() < f64::EPSILON {
        return Some(lo as f64);
    }
    Some(lo as f64 + (v - axis[lo]) / denom)
}

/// Flat index of the source point nearest to (lat, lon), great-circle-ish
/// distance in squared degrees with longitude wraparound.
fn nearest_source_point(lats: &[f64], lons: &[f64], lat: f64, lon: f64) -> Option<usize> {
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (k, (&slat, &slon)) in lats.iter().zip(lons.iter()).enumerate() {
        if !slat.is_finite() || !slon.is_finite() {
            continue;
        }
        let mut dlon = slon - lon;
        while dlon > 180.0 {
            dlon -= 360.0;
        }
        while dlon < -180.0 {
            dlon += 360.0;
        }
        let d2 = (slat - lat).powi(2) + dlon.powi(2);
        if best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((k, d2));
        }
    }
    best.map(|(k, _)| k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cartesian_target(xs: Vec<f64>, ys: Vec<f64>) -> TargetGrid {
        TargetGrid {
            xs,
            ys,
            lats: None,
            lons: None,
            crs: None,
        }
    }

    fn geographic_target(lons_axis: Vec<f64>, lats_axis: Vec<f64>) -> TargetGrid {
        let mut lats = Vec::new();
        let mut lons = Vec::new();
        for &lat in &lats_axis {
            for &lon in &lons_axis {
                lats.push(lat);
                lons.push(lon);
            }
        }
        TargetGrid {
            xs: lons_axis,
            ys: lats_axis,
            lats: Some(lats),
            lons: Some(lons),
            crs: Some(Crs::Geographic),
        }
    }

    #[test]
    fn test_fractional_index_ascending() {
        let axis = vec![0.0, 1.0, 2.0, 3.0];
        assert_eq!(fractional_index(&axis, 0.0), Some(0.0));
        assert_eq!(fractional_index(&axis, 3.0), Some(3.0));
        assert_eq!(fractional_index(&axis, 1.5), Some(1.5));
        assert_eq!(fractional_index(&axis, -0.1), None);
        assert_eq!(fractional_index(&axis, 3.1), None);
        assert_eq!(fractional_index(&axis, f64::NAN), None);
    }

    #[test]
    fn test_fractional_index_descending() {
        let axis = vec![20.0, 19.0, 18.0];
        assert_eq!(fractional_index(&axis, 20.0), Some(0.0));
        assert_eq!(fractional_index(&axis, 19.5), Some(0.5));
        assert_eq!(fractional_index(&axis, 18.0), Some(2.0));
        assert_eq!(fractional_index(&axis, 21.0), None);
    }

    #[test]
    fn test_fractional_index_nonuniform() {
        let axis = vec![0.0, 1.0, 10.0];
        assert_eq!(fractional_index(&axis, 5.5), Some(1.5));
    }

    #[test]
    fn test_cartesian_bilinear_upsample() {
        let data: Vec<f32> = vec![
            1.0, 2.0, //
            3.0, 4.0,
        ];
        let source = SourceGrid {
            data: &data,
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Cartesian {
                xs: vec![0.0, 1.0],
                ys: vec![0.0, 1.0],
            },
        };
        let target = cartesian_target(vec![0.0, 0.5, 1.0], vec![0.0, 0.5, 1.0]);

        let out = BuiltinEngine
            .resample(&source, &target, InterpolationMethod::Bilinear)
            .unwrap();

        assert_eq!(out.len(), 9);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[2], 2.0);
        assert_eq!(out[6], 3.0);
        assert_eq!(out[8], 4.0);
        assert!((out[4] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_aligned_source_linear_field() {
        // phi = lat + lon on a 1-degree grid; bilinear must reproduce the
        // plane exactly at intermediate points
        let lats = vec![10.0, 11.0, 12.0];
        let lons = vec![-50.0, -49.0, -48.0];
        let data: Vec<f32> = lats
            .iter()
            .flat_map(|lat| lons.iter().map(move |lon| (lat + lon) as f32))
            .collect();

        let source = SourceGrid {
            data: &data,
            ny: 3,
            nx: 3,
            geometry: SourceGeometry::Aligned {
                lats: lats.clone(),
                lons: lons.clone(),
            },
        };
        let target = geographic_target(vec![-49.5, -48.5], vec![10.5, 11.5]);

        let out = BuiltinEngine
            .resample(&source, &target, InterpolationMethod::Bilinear)
            .unwrap();

        assert!((out[0] - (10.5 + -49.5) as f32).abs() < 1e-4, "{}", out[0]);
        assert!((out[3] - (11.5 + -48.5) as f32).abs() < 1e-4, "{}", out[3]);
    }

    #[test]
    fn test_aligned_target_outside_is_nan() {
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0, 4.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Aligned {
                lats: vec![10.0, 11.0],
                lons: vec![-50.0, -49.0],
            },
        };
        let target = geographic_target(vec![0.0], vec![0.0]);

        let out = BuiltinEngine
            .resample(&source, &target, InterpolationMethod::Bilinear)
            .unwrap();
        assert!(out[0].is_nan());
    }

    #[test]
    fn test_projected_geographic_identity() {
        // A "projected" source whose projection is the identity behaves
        // exactly like an aligned source
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0, 4.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Projected {
                xs: vec![-50.0, -49.0],
                ys: vec![10.0, 11.0],
                crs: Crs::Geographic,
            },
        };
        let target = geographic_target(vec![-49.5], vec![10.5]);

        let out = BuiltinEngine
            .resample(&source, &target, InterpolationMethod::Bilinear)
            .unwrap();
        assert!((out[0] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_curvilinear_nearest() {
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0, 4.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Curvilinear {
                lats: vec![10.0, 10.0, 11.0, 11.0],
                lons: vec![-50.0, -49.0, -50.0, -49.0],
            },
        };
        let target = geographic_target(vec![-49.1], vec![10.9]);

        let out = BuiltinEngine
            .resample(&source, &target, InterpolationMethod::Nearest)
            .unwrap();
        assert_eq!(out[0], 4.0);
    }

    #[test]
    fn test_curvilinear_bilinear_rejected() {
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0, 4.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Curvilinear {
                lats: vec![10.0, 10.0, 11.0, 11.0],
                lons: vec![-50.0, -49.0, -50.0, -49.0],
            },
        };
        let target = geographic_target(vec![-49.5], vec![10.5]);

        assert!(matches!(
            BuiltinEngine.resample(&source, &target, InterpolationMethod::Bilinear),
            Err(RegridError::EngineError(_))
        ));
    }

    #[test]
    fn test_geographic_source_needs_geographic_target() {
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0, 4.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Aligned {
                lats: vec![10.0, 11.0],
                lons: vec![-50.0, -49.0],
            },
        };
        let target = cartesian_target(vec![0.0, 1.0], vec![0.0, 1.0]);

        assert!(matches!(
            BuiltinEngine.resample(&source, &target, InterpolationMethod::Bilinear),
            Err(RegridError::EngineError(_))
        ));
    }

    #[test]
    fn test_shape_validation() {
        let source = SourceGrid {
            data: &[1.0, 2.0, 3.0],
            ny: 2,
            nx: 2,
            geometry: SourceGeometry::Cartesian {
                xs: vec![0.0, 1.0],
                ys: vec![0.0, 1.0],
            },
        };
        let target = cartesian_target(vec![0.0], vec![0.0]);

        assert!(matches!(
            BuiltinEngine.resample(&source, &target, InterpolationMethod::Nearest),
            Err(RegridError::ShapeMismatch { .. })
        ));
    }
}
