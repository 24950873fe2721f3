//! CF `grid_mapping` metadata parsing.
//!
//! CF-convention datasets describe their projection through a `grid_mapping`
//! attribute on the data variable, naming a container variable whose
//! attributes hold the projection parameters. This module turns that
//! structure into a [`Crs`].

use std::collections::BTreeMap;

use regrid_common::{AttrValue, DataField};

use crate::azimuthal::{self, AzimuthalEqualArea};
use crate::crs::{Crs, ProjectionError};
use crate::geostationary::{Geostationary, SweepAxis};
use crate::lambert::{self, LambertConformal};

/// Parse the CF grid mapping carried by a field into a [`Crs`].
///
/// Returns [`ProjectionError::NoProjectionInformation`] when the field has no
/// `grid_mapping` attribute at all, so callers can fall through to other ways
/// of locating coordinates.
pub fn parse_cf(field: &DataField) -> Result<Crs, ProjectionError> {
    let mapping_ref = field
        .attr_str("grid_mapping")
        .ok_or(ProjectionError::NoProjectionInformation)?;

    // The extended form is "name: coord1 coord2 ..."; only the name matters.
    let mapping_name = mapping_ref
        .split(':')
        .next()
        .unwrap_or(mapping_ref)
        .trim();

    let mapping = field
        .coord(mapping_name)
        .ok_or_else(|| ProjectionError::MissingMappingVariable(mapping_name.to_string()))?;

    let gm_name = mapping
        .attrs
        .get("grid_mapping_name")
        .and_then(AttrValue::as_str)
        .ok_or_else(|| ProjectionError::MissingParameter("grid_mapping_name".to_string()))?;

    match gm_name {
        "latitude_longitude" => Ok(Crs::Geographic),
        "geostationary" => parse_geostationary(&mapping.attrs),
        "lambert_conformal_conic" => parse_lambert_conformal(&mapping.attrs),
        "lambert_azimuthal_equal_area" => parse_azimuthal_equal_area(&mapping.attrs),
        other => Err(ProjectionError::UnsupportedGridMapping(other.to_string())),
    }
}

fn parse_geostationary(
    attrs: &BTreeMap<String, AttrValue>,
) -> Result<Crs, ProjectionError> {
    let sweep = match optional_str(attrs, "sweep_angle_axis").unwrap_or("x") {
        "x" => SweepAxis::X,
        "y" => SweepAxis::Y,
        other => {
            return Err(ProjectionError::InvalidParameter {
                name: "sweep_angle_axis".to_string(),
                message: format!("expected \"x\" or \"y\", got \"{}\"", other),
            })
        }
    };

    Ok(Crs::Geostationary(Geostationary {
        perspective_point_height: required(attrs, "perspective_point_height")?,
        semi_major_axis: optional(attrs, "semi_major_axis", 6378137.0),
        semi_minor_axis: optional(attrs, "semi_minor_axis", 6356752.31414),
        longitude_origin: required(attrs, "longitude_of_projection_origin")?,
        latitude_origin: optional(attrs, "latitude_of_projection_origin", 0.0),
        sweep,
    }))
}

fn parse_lambert_conformal(
    attrs: &BTreeMap<String, AttrValue>,
) -> Result<Crs, ProjectionError> {
    let parallels = attrs
        .get("standard_parallel")
        .and_then(AttrValue::as_f64_list)
        .ok_or_else(|| ProjectionError::MissingParameter("standard_parallel".to_string()))?;

    let (latin1, latin2) = match parallels.as_slice() {
        [one] => (*one, *one),
        [first, second] => (*first, *second),
        other => {
            return Err(ProjectionError::InvalidParameter {
                name: "standard_parallel".to_string(),
                message: format!("expected 1 or 2 values, got {}", other.len()),
            })
        }
    };

    Ok(Crs::LambertConformal(LambertConformal::from_cf(
        required(attrs, "longitude_of_central_meridian")?,
        required(attrs, "latitude_of_projection_origin")?,
        (latin1, latin2),
        optional(attrs, "false_easting", 0.0),
        optional(attrs, "false_northing", 0.0),
        optional(attrs, "earth_radius", lambert::DEFAULT_EARTH_RADIUS),
    )))
}

fn parse_azimuthal_equal_area(
    attrs: &BTreeMap<String, AttrValue>,
) -> Result<Crs, ProjectionError> {
    let mut proj = AzimuthalEqualArea::new(
        required(attrs, "longitude_of_projection_origin")?,
        required(attrs, "latitude_of_projection_origin")?,
    )
    .with_radius(optional(
        attrs,
        "earth_radius",
        azimuthal::DEFAULT_SPHERE_RADIUS,
    ));
    proj.false_easting = optional(attrs, "false_easting", 0.0);
    proj.false_northing = optional(attrs, "false_northing", 0.0);

    Ok(Crs::AzimuthalEqualArea(proj))
}

fn required(attrs: &BTreeMap<String, AttrValue>, name: &str) -> Result<f64, ProjectionError> {
    match attrs.get(name) {
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ProjectionError::InvalidParameter {
                name: name.to_string(),
                message: format!("not a number: {:?}", value),
            }),
        None => Err(ProjectionError::MissingParameter(name.to_string())),
    }
}

fn optional(attrs: &BTreeMap<String, AttrValue>, name: &str, default: f64) -> f64 {
    attrs.get(name).and_then(AttrValue::as_f64).unwrap_or(default)
}

fn optional_str<'a>(attrs: &'a BTreeMap<String, AttrValue>, name: &str) -> Option<&'a str> {
    attrs.get(name).and_then(AttrValue::as_str)
}
