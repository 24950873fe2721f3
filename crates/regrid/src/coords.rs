//! Coordinate resolution for gridded datasets.
//!
//! The common interface for getting lat/lon coordinates for a dataset,
//! whether they are given directly as coordinate variables or must be
//! calculated from projection metadata.

use projection::parse_cf;
use regrid_common::{Coord, DataField, RegridError, Result};

/// Resolved geographic coordinates of a dataset.
#[derive(Debug, Clone)]
pub enum LatLonCoords {
    /// 1D lat/lon axes: the grid follows the latitude and longitude
    /// directions. `lats` indexes rows, `lons` columns.
    Aligned { lats: Vec<f64>, lons: Vec<f64> },
    /// 2D auxiliary lat/lon, row-major over `(ny, nx)`.
    Curvilinear {
        lats: Vec<f64>,
        lons: Vec<f64>,
        ny: usize,
        nx: usize,
    },
}

/// Whether the field carries both `lat` and `lon` coordinate variables.
pub fn has_latlon_coords(field: &DataField) -> bool {
    field.has_coord("lat") && field.has_coord("lon")
}

/// Whether the field's grid is aligned with the lat/lon directions, i.e. it
/// has `lat` and `lon` coordinates and both are 1D.
pub fn on_latlon_aligned_grid(field: &DataField) -> bool {
    match (field.coord("lat"), field.coord("lon")) {
        (Some(lat), Some(lon)) => lat.is_1d() && lon.is_1d(),
        _ => false,
    }
}

/// Derive 2D lat/lon coordinates from the field's projection metadata.
///
/// Requires CF `grid_mapping` metadata plus 1D projection coordinate axes
/// named after the field's dimensions. Grid points the projection cannot map
/// (e.g. off-disk pixels of a full-disk satellite scene) get NaN.
pub fn latlon_coords_using_crs(field: &DataField) -> Result<LatLonCoords> {
    let crs = parse_cf(field)?;

    let xs = native_axis_values(field, field.x_dim(), &crs)?;
    let ys = native_axis_values(field, field.y_dim(), &crs)?;
    let (ny, nx) = (ys.len(), xs.len());

    tracing::debug!(
        grid_mapping = crs.grid_mapping_name(),
        ny,
        nx,
        "deriving lat/lon coordinates from projection metadata"
    );

    let mut lats = Vec::with_capacity(ny * nx);
    let mut lons = Vec::with_capacity(ny * nx);
    for &y in &ys {
        for &x in &xs {
            match crs.unproject(x, y) {
                Some((lon, lat)) => {
                    lons.push(lon);
                    lats.push(lat);
                }
                None => {
                    lons.push(f64::NAN);
                    lats.push(f64::NAN);
                }
            }
        }
    }

    Ok(LatLonCoords::Curvilinear { lats, lons, ny, nx })
}

/// Resolve the field's lat/lon coordinates from whatever form it carries.
///
/// Direct coordinate variables win; otherwise the coordinates are derived
/// from projection metadata.
pub fn resolve_latlon(field: &DataField) -> Result<LatLonCoords> {
    if let (Some(lat), Some(lon)) = (field.coord("lat"), field.coord("lon")) {
        return match (lat.ndim(), lon.ndim()) {
            (1, 1) => {
                tracing::debug!(field = %field.name, "using aligned 1D lat/lon coordinates");
                Ok(LatLonCoords::Aligned {
                    lats: lat.values.clone(),
                    lons: lon.values.clone(),
                })
            }
            (2, 2) => {
                tracing::debug!(field = %field.name, "using auxiliary 2D lat/lon coordinates");
                Ok(LatLonCoords::Curvilinear {
                    lats: lat.values.clone(),
                    lons: lon.values.clone(),
                    ny: field.ny(),
                    nx: field.nx(),
                })
            }
            (a, b) => Err(RegridError::invalid_metadata(format!(
                "lat/lon coordinates must both be 1D or both be 2D, got {}D lat and {}D lon",
                a, b
            ))),
        };
    }

    latlon_coords_using_crs(field)
}

/// Read a 1D projection axis in the projection's native units.
///
/// Geostationary datasets sometimes store scan angles pre-multiplied into
/// meters; those are converted back to radians so the projection can use
/// them.
pub(crate) fn native_axis_values(
    field: &DataField,
    dim: &str,
    crs: &projection::Crs,
) -> Result<Vec<f64>> {
    let coord = field
        .dim_coord(dim)
        .ok_or_else(|| RegridError::missing_coordinate(dim))?;

    if coord.len() != field.dim_len(dim).unwrap_or(0) {
        return Err(RegridError::shape_mismatch(
            format!("{} (dim `{}`)", field.dim_len(dim).unwrap_or(0), dim),
            coord.len().to_string(),
        ));
    }

    Ok(scaled_axis(coord, crs))
}

fn scaled_axis(coord: &Coord, crs: &projection::Crs) -> Vec<f64> {
    match (crs.meters_per_native_unit(), coord.unit()) {
        (Some(scale), Some("m")) => coord.values.iter().map(|v| v / scale).collect(),
        _ => coord.values.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrid_common::Coord;

    fn aligned_field() -> DataField {
        let mut field = DataField::new("phi", vec![0.0; 6], 2, 3)
            .unwrap()
            .with_dims("lat", "lon");
        field
            .insert_coord("lat", Coord::new_1d("lat", vec![10.0, 11.0]))
            .unwrap();
        field
            .insert_coord("lon", Coord::new_1d("lon", vec![-50.0, -49.0, -48.0]))
            .unwrap();
        field
    }

    #[test]
    fn test_has_latlon_coords() {
        assert!(has_latlon_coords(&aligned_field()));

        let bare = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        assert!(!has_latlon_coords(&bare));

        // lat alone is not enough
        let mut lat_only = DataField::new("phi", vec![0.0; 6], 2, 3)
            .unwrap()
            .with_dims("lat", "lon");
        lat_only
            .insert_coord("lat", Coord::new_1d("lat", vec![10.0, 11.0]))
            .unwrap();
        assert!(!has_latlon_coords(&lat_only));
    }

    #[test]
    fn test_on_latlon_aligned_grid() {
        assert!(on_latlon_aligned_grid(&aligned_field()));

        // 2D lat/lon is not aligned
        let mut curvi = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        curvi
            .insert_coord("lat", Coord::new_2d("y", "x", vec![0.0; 6]))
            .unwrap();
        curvi
            .insert_coord("lon", Coord::new_2d("y", "x", vec![0.0; 6]))
            .unwrap();
        assert!(!on_latlon_aligned_grid(&curvi));
    }

    #[test]
    fn test_resolve_aligned() {
        match resolve_latlon(&aligned_field()).unwrap() {
            LatLonCoords::Aligned { lats, lons } => {
                assert_eq!(lats, vec![10.0, 11.0]);
                assert_eq!(lons, vec![-50.0, -49.0, -48.0]);
            }
            other => panic!("expected aligned coords, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_mixed_dims_is_invalid() {
        let mut field = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        field
            .insert_coord("lat", Coord::new_2d("y", "x", vec![0.0; 6]))
            .unwrap();
        field
            .insert_coord("lon", Coord::new_1d("x", vec![0.0, 1.0, 2.0]))
            .unwrap();

        assert!(matches!(
            resolve_latlon(&field),
            Err(RegridError::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_resolve_without_any_geography() {
        let field = DataField::new("phi", vec![0.0; 6], 2, 3).unwrap();
        assert!(matches!(
            resolve_latlon(&field),
            Err(RegridError::NoProjectionInformation)
        ));
    }
}
