//! Resampling a field onto a domain's regular grid.
//!
//! Builds the source-grid description from whatever geography the field
//! carries, the target grid from the domain, and hands both to a regridding
//! engine. The output field lives on the domain's Cartesian grid with x/y
//! coordinates in meters and, for geographic domains, the lat/lon of every
//! grid point.

use projection::parse_cf;
use regrid_common::{Coord, DataField, InterpolationMethod, RegridError, Result};

use crate::config::RegridConfig;
use crate::coords::{self, on_latlon_aligned_grid, resolve_latlon, LatLonCoords};
use crate::crop::crop_field_to_domain;
use crate::domain::{CartesianDomain, LocalCartesianDomain, TargetGrid};
use crate::engine::{BuiltinEngine, RegridEngine, SourceGeometry, SourceGrid};

/// Resample a field onto a local Cartesian domain grid with spacing `dx`
/// meters, using the built-in engine.
pub fn resample(
    domain: &LocalCartesianDomain,
    field: &DataField,
    dx: f64,
    method: InterpolationMethod,
    keep_attrs: bool,
) -> Result<DataField> {
    resample_with_engine(domain, field, dx, method, keep_attrs, &BuiltinEngine)
}

/// Resample a field onto a local Cartesian domain grid with a caller-chosen
/// engine.
pub fn resample_with_engine(
    domain: &LocalCartesianDomain,
    field: &DataField,
    dx: f64,
    method: InterpolationMethod,
    keep_attrs: bool,
    engine: &dyn RegridEngine,
) -> Result<DataField> {
    let target = domain.grid(dx)?;
    let geometry = source_geometry(field)?;

    tracing::debug!(
        field = %field.name,
        source = geometry_kind(&geometry),
        dx,
        target_shape = ?target.shape(),
        "resampling onto local Cartesian domain"
    );

    let source = SourceGrid {
        data: field.data(),
        ny: field.ny(),
        nx: field.nx(),
        geometry,
    };

    let out = engine.resample(&source, &target, method)?;
    assemble_output(field, &target, out, keep_attrs)
}

/// Crop a field to the domain and resample it onto the domain grid in one
/// step, with padding, method and attribute handling taken from `config`.
pub fn crop_and_resample(
    domain: &LocalCartesianDomain,
    field: &DataField,
    dx: f64,
    config: &RegridConfig,
) -> Result<DataField> {
    config.validate()?;
    let cropped = crop_field_to_domain(domain, field, config.pad_pct)?;
    resample(domain, &cropped, dx, config.method, config.keep_attrs)
}

/// Resample a field already on an x/y meter grid onto a Cartesian domain.
pub fn resample_cartesian(
    domain: &CartesianDomain,
    field: &DataField,
    dx: f64,
    method: InterpolationMethod,
    keep_attrs: bool,
) -> Result<DataField> {
    let target = domain.grid(dx)?;

    let xs = field
        .dim_coord(field.x_dim())
        .ok_or_else(|| RegridError::missing_coordinate(field.x_dim()))?
        .values
        .clone();
    let ys = field
        .dim_coord(field.y_dim())
        .ok_or_else(|| RegridError::missing_coordinate(field.y_dim()))?
        .values
        .clone();

    let source = SourceGrid {
        data: field.data(),
        ny: field.ny(),
        nx: field.nx(),
        geometry: SourceGeometry::Cartesian { xs, ys },
    };

    let out = BuiltinEngine.resample(&source, &target, method)?;
    assemble_output(field, &target, out, keep_attrs)
}

/// Decide how the source grid's geography is expressed.
///
/// Aligned 1D lat/lon wins when present. Projection metadata is preferred
/// over derived 2D lat/lon because the projected form keeps an invertible
/// mapping, which the built-in engine needs for bilinear and cubic
/// resampling.
fn source_geometry(field: &DataField) -> Result<SourceGeometry> {
    if on_latlon_aligned_grid(field) {
        if field.y_dim() != "lat" || field.x_dim() != "lon" {
            return Err(RegridError::invalid_metadata(format!(
                "lat/lon aligned field must have (lat, lon) dimensions, got ({}, {})",
                field.y_dim(),
                field.x_dim()
            )));
        }
        let lats = field
            .dim_coord("lat")
            .ok_or_else(|| RegridError::missing_coordinate("lat"))?
            .values
            .clone();
        let lons = field
            .dim_coord("lon")
            .ok_or_else(|| RegridError::missing_coordinate("lon"))?
            .values
            .clone();
        return Ok(SourceGeometry::Aligned { lats, lons });
    }

    if field.attr_str("grid_mapping").is_some() {
        let crs = parse_cf(field)?;
        let xs = coords::native_axis_values(field, field.x_dim(), &crs)?;
        let ys = coords::native_axis_values(field, field.y_dim(), &crs)?;
        return Ok(SourceGeometry::Projected { xs, ys, crs });
    }

    match resolve_latlon(field)? {
        LatLonCoords::Aligned { lats, lons } => Ok(SourceGeometry::Aligned { lats, lons }),
        LatLonCoords::Curvilinear { lats, lons, .. } => {
            Ok(SourceGeometry::Curvilinear { lats, lons })
        }
    }
}

fn geometry_kind(geometry: &SourceGeometry) -> &'static str {
    match geometry {
        SourceGeometry::Aligned { .. } => "aligned",
        SourceGeometry::Curvilinear { .. } => "curvilinear",
        SourceGeometry::Projected { .. } => "projected",
        SourceGeometry::Cartesian { .. } => "cartesian",
    }
}

fn assemble_output(
    field: &DataField,
    target: &TargetGrid,
    out: Vec<f32>,
    keep_attrs: bool,
) -> Result<DataField> {
    let (tny, tnx) = target.shape();
    let mut out_field = DataField::new(field.name.clone(), out, tny, tnx)?;

    out_field.insert_coord(
        "x",
        Coord::new_1d("x", target.xs.clone()).with_attr("units", "m"),
    )?;
    out_field.insert_coord(
        "y",
        Coord::new_1d("y", target.ys.clone()).with_attr("units", "m"),
    )?;

    if let (Some(lats), Some(lons)) = (&target.lats, &target.lons) {
        out_field.insert_coord(
            "lat",
            Coord::new_2d("y", "x", lats.clone()).with_attr("units", "degrees_north"),
        )?;
        out_field.insert_coord(
            "lon",
            Coord::new_2d("y", "x", lons.clone()).with_attr("units", "degrees_east"),
        )?;
    }

    if keep_attrs {
        out_field.attrs = field.attrs.clone();
    }
    out_field.valid_time = field.valid_time;

    Ok(out_field)
}
