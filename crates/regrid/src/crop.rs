//! Cropping gridded fields to a target domain.
//!
//! Cropping is a coordinate-value selection along the two spatial dimensions.
//! How the selection range is obtained depends on what geography the field
//! carries: direct spatial meters, direct lat/lon axes, or projection
//! metadata through which the domain bounds must first be transformed.

use std::ops::Range;

use projection::parse_cf;
use regrid_common::{DataField, RegridError, Result};

use crate::coords::has_latlon_coords;
use crate::domain::{CartesianDomain, LocalCartesianDomain};

/// Crop a field to coordinate-value ranges along two named dimensions.
///
/// Both ranges are padded by `pad_pct` of their own span before selection.
/// Dimensions whose coordinates decrease are handled; the selected rows and
/// columns always cover the requested value range regardless of coordinate
/// order. The result may be empty if the ranges miss the data.
pub fn crop_field_to_bbox(
    field: &DataField,
    x_range: (f64, f64),
    y_range: (f64, f64),
    pad_pct: f64,
    x_dim: &str,
    y_dim: &str,
) -> Result<DataField> {
    if !field.has_dim(x_dim) || !field.has_dim(y_dim) {
        return Err(RegridError::MissingDimension {
            wanted: format!("{}, {}", x_dim, y_dim),
            present: format!("{}, {}", field.y_dim(), field.x_dim()),
        });
    }

    let (x_min, x_max) = pad_range(x_range, pad_pct);
    let (y_min, y_max) = pad_range(y_range, pad_pct);

    let x_coord = field
        .dim_coord(x_dim)
        .ok_or_else(|| RegridError::missing_coordinate(x_dim))?;
    let y_coord = field
        .dim_coord(y_dim)
        .ok_or_else(|| RegridError::missing_coordinate(y_dim))?;

    let x_idx = select_range(&x_coord.values, x_min, x_max);
    let y_idx = select_range(&y_coord.values, y_min, y_max);

    tracing::debug!(
        field = %field.name,
        x_dim,
        y_dim,
        x_range = ?(x_min, x_max),
        y_range = ?(y_min, y_max),
        cols = ?x_idx,
        rows = ?y_idx,
        "cropping field to value ranges"
    );

    // Map the named dims onto the field's row/column axes
    let (rows, cols) = if x_dim == field.x_dim() {
        (y_idx, x_idx)
    } else {
        (x_idx, y_idx)
    };

    field.slice(rows, cols)
}

/// Crop a field to a local Cartesian domain.
///
/// The selection range is derived from whichever geography the field
/// carries, tried in order:
///
/// 1. spatial `x`/`y` coordinates in meters without projection metadata:
///    crop against the domain's projected extent directly
/// 2. direct `lat`/`lon` axes: crop against the domain's geographic bounds,
///    snapped outward to whole degrees
/// 3. CF `grid_mapping` metadata: transform the snapped bounds into the
///    field's own projection and crop along its projection axes. This also
///    covers meter-valued axes of an angular projection; those meters are in
///    the satellite frame, not the domain's.
pub fn crop_field_to_domain(
    domain: &LocalCartesianDomain,
    field: &DataField,
    pad_pct: f64,
) -> Result<DataField> {
    let cropped = if has_spatial_meter_coords(field) && field.attr_str("grid_mapping").is_none() {
        let (x_min, y_min, x_max, y_max) = domain.spatial_bounds();
        tracing::debug!(field = %field.name, "cropping in local Cartesian meters");
        crop_field_to_bbox(field, (x_min, x_max), (y_min, y_max), pad_pct, "x", "y")?
    } else if has_latlon_coords(field) {
        let bbox = domain.latlon_bounds()?.snap_outward();
        let bbox = adjust_for_longitude_convention(field, bbox)?;
        tracing::debug!(field = %field.name, bbox = ?bbox, "cropping along lat/lon axes");
        crop_field_to_bbox(
            field,
            (bbox.min_lon, bbox.max_lon),
            (bbox.min_lat, bbox.max_lat),
            pad_pct,
            "lon",
            "lat",
        )?
    } else if field.attr_str("grid_mapping").is_some() {
        let crs = parse_cf(field)?;
        let bbox = domain.latlon_bounds()?.snap_outward();

        // The source data is stored in its own projection, so the domain
        // bounds are transformed into that projection's coordinates
        let corners = [
            (bbox.min_lon, bbox.min_lat),
            (bbox.min_lon, bbox.max_lat),
            (bbox.max_lon, bbox.min_lat),
            (bbox.max_lon, bbox.max_lat),
        ];

        let scale = native_to_file_units_scale(field, &crs);
        let mut xs = Vec::with_capacity(corners.len());
        let mut ys = Vec::with_capacity(corners.len());
        for (lon, lat) in corners {
            if let Some((x, y)) = crs.project(lon, lat) {
                xs.push(x * scale);
                ys.push(y * scale);
            }
        }

        if xs.is_empty() {
            return Err(RegridError::outside_input(
                format!("{:?}", bbox),
                format!("projection {}", crs.grid_mapping_name()),
            ));
        }

        let x_range = (
            xs.iter().cloned().fold(f64::INFINITY, f64::min),
            xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        );
        let y_range = (
            ys.iter().cloned().fold(f64::INFINITY, f64::min),
            ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        );

        tracing::debug!(
            field = %field.name,
            grid_mapping = crs.grid_mapping_name(),
            x_range = ?x_range,
            y_range = ?y_range,
            "cropping along projection axes"
        );
        crop_field_to_bbox(
            field,
            x_range,
            y_range,
            pad_pct,
            field.x_dim(),
            field.y_dim(),
        )?
    } else {
        return Err(RegridError::NoProjectionInformation);
    };

    ensure_not_empty(&cropped, domain)?;
    Ok(cropped)
}

/// Crop a field on a plain x/y grid to a Cartesian domain.
pub fn crop_field_to_cartesian_domain(
    domain: &CartesianDomain,
    field: &DataField,
    pad_pct: f64,
) -> Result<DataField> {
    let (x_min, y_min, x_max, y_max) = domain.spatial_bounds();
    let cropped = crop_field_to_bbox(field, (x_min, x_max), (y_min, y_max), pad_pct, "x", "y")?;

    if cropped.ny() == 0 || cropped.nx() == 0 {
        return Err(RegridError::outside_input(
            format!("({}, {})..({}, {}) m", x_min, y_min, x_max, y_max),
            format!("{} x {} field", field.ny(), field.nx()),
        ));
    }
    Ok(cropped)
}

fn ensure_not_empty(cropped: &DataField, domain: &LocalCartesianDomain) -> Result<()> {
    if cropped.ny() == 0 || cropped.nx() == 0 {
        return Err(RegridError::outside_input(
            format!(
                "{} x {} m around ({}, {})",
                domain.l_zonal, domain.l_meridional, domain.central_longitude, domain.central_latitude
            ),
            format!("{} x {} field", cropped.ny(), cropped.nx()),
        ));
    }
    Ok(())
}

fn pad_range(range: (f64, f64), pad_pct: f64) -> (f64, f64) {
    let (mut lo, mut hi) = range;
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    let span = hi - lo;
    (lo - pad_pct * span, hi + pad_pct * span)
}

/// Indices of the contiguous run of values inside [min, max].
///
/// Works for ascending and descending coordinates alike; a coordinate with
/// no values in range yields an empty range.
fn select_range(values: &[f64], min: f64, max: f64) -> Range<usize> {
    let mut start = None;
    let mut end = 0;
    for (i, v) in values.iter().enumerate() {
        if *v >= min && *v <= max {
            if start.is_none() {
                start = Some(i);
            }
            end = i + 1;
        }
    }
    match start {
        Some(s) => s..end,
        None => 0..0,
    }
}

fn has_spatial_meter_coords(field: &DataField) -> bool {
    let meters = |name: &str| {
        field
            .coord(name)
            .map_or(false, |c| c.unit() == Some("m"))
    };
    meters("x") && meters("y")
}

/// Reconcile the crop box with the dataset's longitude convention.
///
/// Datasets on [0, 360) longitudes get a wholly-negative box shifted east by
/// 360 degrees; a box straddling the seam cannot be expressed as one
/// contiguous selection.
fn adjust_for_longitude_convention(
    field: &DataField,
    bbox: regrid_common::LatLonBox,
) -> Result<regrid_common::LatLonBox> {
    let lon_coord = field
        .dim_coord("lon")
        .ok_or_else(|| RegridError::missing_coordinate("lon"))?;

    let uses_0_360 = lon_coord.values.last().map_or(false, |&last| last > 180.0);
    if !uses_0_360 {
        return Ok(bbox);
    }

    if bbox.max_lon < 0.0 {
        Ok(bbox.shift_lon(360.0))
    } else if bbox.min_lon < 0.0 {
        Err(RegridError::UnsupportedLongitudeConvention(format!(
            "crop box ({}, {}) straddles the 0/360 longitude seam of the dataset",
            bbox.min_lon, bbox.max_lon
        )))
    } else {
        Ok(bbox)
    }
}

fn native_to_file_units_scale(field: &DataField, crs: &projection::Crs) -> f64 {
    let file_units_are_meters = field
        .dim_coord(field.x_dim())
        .and_then(|c| c.unit().map(|u| u == "m"))
        .unwrap_or(false);

    match crs.meters_per_native_unit() {
        Some(scale) if file_units_are_meters => scale,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrid_common::Coord;

    fn latlon_field(lat_values: Vec<f64>, lon_values: Vec<f64>) -> DataField {
        let ny = lat_values.len();
        let nx = lon_values.len();
        let data: Vec<f32> = (0..ny * nx).map(|i| i as f32).collect();
        let mut field = DataField::new("phi", data, ny, nx)
            .unwrap()
            .with_dims("lat", "lon");
        field
            .insert_coord("lat", Coord::new_1d("lat", lat_values))
            .unwrap();
        field
            .insert_coord("lon", Coord::new_1d("lon", lon_values))
            .unwrap();
        field
    }

    fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
        let n = ((stop - start) / step).round() as usize;
        (0..n).map(|i| start + i as f64 * step).collect()
    }

    #[test]
    fn test_crop_to_bbox_selects_range() {
        let field = latlon_field(arange(5.0, 20.0, 1.0), arange(-70.0, -30.0, 1.0));
        let cropped =
            crop_field_to_bbox(&field, (-50.0, -45.0), (10.0, 13.0), 0.0, "lon", "lat").unwrap();

        let lons = &cropped.dim_coord("lon").unwrap().values;
        let lats = &cropped.dim_coord("lat").unwrap().values;
        assert_eq!(lons.first(), Some(&-50.0));
        assert_eq!(lons.last(), Some(&-45.0));
        assert_eq!(lats.first(), Some(&10.0));
        assert_eq!(lats.last(), Some(&13.0));
        assert_eq!(cropped.shape(), (4, 6));
    }

    #[test]
    fn test_crop_to_bbox_pads() {
        let field = latlon_field(arange(0.0, 30.0, 1.0), arange(0.0, 30.0, 1.0));
        // 10% of a 10-degree span pads one degree on each side
        let cropped =
            crop_field_to_bbox(&field, (10.0, 20.0), (10.0, 20.0), 0.1, "lon", "lat").unwrap();

        let lons = &cropped.dim_coord("lon").unwrap().values;
        assert_eq!(lons.first(), Some(&9.0));
        assert_eq!(lons.last(), Some(&21.0));
    }

    #[test]
    fn test_crop_to_bbox_descending_coords() {
        // Satellite-style latitude decreasing from north to south
        let field = latlon_field(arange(20.0, 5.0, -1.0), arange(-70.0, -30.0, 1.0));
        let cropped =
            crop_field_to_bbox(&field, (-50.0, -45.0), (10.0, 13.0), 0.0, "lon", "lat").unwrap();

        let lats = &cropped.dim_coord("lat").unwrap().values;
        assert_eq!(lats.first(), Some(&13.0));
        assert_eq!(lats.last(), Some(&10.0));
        assert!(cropped.dim_coord("lat").unwrap().is_descending());
    }

    #[test]
    fn test_crop_to_bbox_missing_dims() {
        let field = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        let result = crop_field_to_bbox(&field, (0.0, 1.0), (0.0, 1.0), 0.0, "lon", "lat");
        assert!(matches!(
            result,
            Err(RegridError::MissingDimension { .. })
        ));
    }

    #[test]
    fn test_crop_to_domain_latlon() {
        let field = latlon_field(arange(5.0, 20.0, 0.5), arange(-70.0, -30.0, 0.5));
        let domain = LocalCartesianDomain::new(14.0, -48.0, 1000.0e3, 500.0e3).unwrap();

        let cropped = crop_field_to_domain(&domain, &field, 0.0).unwrap();
        let bounds = domain.latlon_bounds().unwrap();

        let lons = &cropped.dim_coord("lon").unwrap().values;
        let lats = &cropped.dim_coord("lat").unwrap().values;
        // Snapped-outward whole-degree bounds contain the domain
        assert!(*lons.first().unwrap() <= bounds.min_lon.ceil());
        assert!(*lons.last().unwrap() >= bounds.max_lon.floor());
        assert!(*lats.first().unwrap() <= bounds.min_lat.ceil());
        assert!(*lats.last().unwrap() >= bounds.max_lat.floor());
    }

    #[test]
    fn test_crop_to_domain_0_360_longitudes() {
        // Same data, 0-360 longitude convention (e.g. global model output)
        let field = latlon_field(arange(5.0, 20.0, 0.5), arange(290.0, 330.0, 0.5));
        let domain = LocalCartesianDomain::new(14.0, -48.0, 1000.0e3, 500.0e3).unwrap();

        let cropped = crop_field_to_domain(&domain, &field, 0.0).unwrap();
        let lons = &cropped.dim_coord("lon").unwrap().values;
        // -48 maps to 312 in the dataset's convention
        assert!(*lons.first().unwrap() > 300.0 && *lons.last().unwrap() < 325.0);
    }

    #[test]
    fn test_crop_to_domain_straddling_seam() {
        let field = latlon_field(arange(-10.0, 10.0, 0.5), arange(0.0, 360.0, 1.0));
        // A domain centered on the prime meridian straddles the seam of a
        // 0-360 dataset
        let domain = LocalCartesianDomain::new(0.0, 0.0, 1000.0e3, 500.0e3).unwrap();

        assert!(matches!(
            crop_field_to_domain(&domain, &field, 0.0),
            Err(RegridError::UnsupportedLongitudeConvention(_))
        ));
    }

    #[test]
    fn test_crop_to_domain_outside_input() {
        let field = latlon_field(arange(5.0, 20.0, 0.5), arange(-70.0, -30.0, 0.5));
        // Domain on the other side of the world
        let domain = LocalCartesianDomain::new(14.0, 130.0, 1000.0e3, 500.0e3).unwrap();

        assert!(matches!(
            crop_field_to_domain(&domain, &field, 0.0),
            Err(RegridError::DomainBoundsOutsideOfInput { .. })
        ));
    }

    #[test]
    fn test_crop_to_domain_spatial_meters() {
        let xs = arange(-500.0e3, 500.0e3, 10.0e3);
        let ys = arange(-250.0e3, 250.0e3, 10.0e3);
        let data: Vec<f32> = (0..xs.len() * ys.len()).map(|i| i as f32).collect();
        let mut field = DataField::new("w", data, ys.len(), xs.len()).unwrap();
        field
            .insert_coord("x", Coord::new_1d("x", xs).with_attr("units", "m"))
            .unwrap();
        field
            .insert_coord("y", Coord::new_1d("y", ys).with_attr("units", "m"))
            .unwrap();

        let domain = LocalCartesianDomain::new(12.0, -55.0, 200.0e3, 100.0e3).unwrap();
        let cropped = crop_field_to_domain(&domain, &field, 0.0).unwrap();

        let xs = &cropped.dim_coord("x").unwrap().values;
        let ys = &cropped.dim_coord("y").unwrap().values;
        assert!(*xs.first().unwrap() >= -100.0e3);
        assert!(*xs.last().unwrap() <= 100.0e3);
        assert!(*ys.first().unwrap() >= -50.0e3);
        assert!(*ys.last().unwrap() <= 50.0e3);
    }

    #[test]
    fn test_crop_without_geography() {
        let field = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        let domain = LocalCartesianDomain::new(12.0, -55.0, 200.0e3, 100.0e3).unwrap();

        assert!(matches!(
            crop_field_to_domain(&domain, &field, 0.1),
            Err(RegridError::NoProjectionInformation)
        ));
    }

    #[test]
    fn test_select_range_edges() {
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(select_range(&values, 1.0, 3.0), 1..4);
        assert_eq!(select_range(&values, -5.0, -1.0), 0..0);
        assert_eq!(select_range(&values, 3.5, 10.0), 4..5);
    }
}
