//! Ready-made fixture datasets in each geography the library handles.

use projection::Geostationary;
use regrid_common::{Coord, DataField};

use crate::generators::{arange, plane_field, wave_field};

/// Coefficients of the scan-angle plane stored in [`goes_like_field`], so
/// tests can recompute expected values at arbitrary scan angles.
pub const GOES_PLANE_A: f64 = 4000.0;
pub const GOES_PLANE_B: f64 = 8000.0;

/// An aligned lat/lon field carrying the smooth `sin(lat) * cos(lon)` wave.
///
/// Spans are half-open like arange; `step` applies to both axes.
pub fn aligned_latlon_field(lat_span: (f64, f64), lon_span: (f64, f64), step: f64) -> DataField {
    let lats = arange(lat_span.0, lat_span.1, step);
    let lons = arange(lon_span.0, lon_span.1, step);
    let data = wave_field(&lats, &lons);

    let mut field = DataField::new("phi", data, lats.len(), lons.len())
        .expect("fixture shape is consistent")
        .with_dims("lat", "lon");
    field
        .insert_coord(
            "lat",
            Coord::new_1d("lat", lats).with_attr("units", "degrees_north"),
        )
        .expect("lat axis matches fixture shape");
    field
        .insert_coord(
            "lon",
            Coord::new_1d("lon", lons).with_attr("units", "degrees_east"),
        )
        .expect("lon axis matches fixture shape");
    field
}

/// Like [`aligned_latlon_field`] but with longitudes in the [0, 360)
/// convention of global model output.
pub fn aligned_0_360_field(lat_span: (f64, f64), lon_span_0_360: (f64, f64), step: f64) -> DataField {
    aligned_latlon_field(lat_span, lon_span_0_360, step)
}

/// A geostationary-projected scene over the tropical Atlantic as seen from
/// GOES-East: scan-angle x/y axes in radians (y descending, north first), CF
/// grid mapping metadata, and data that is a plane in scan-angle space
/// (`GOES_PLANE_A * x + GOES_PLANE_B * y`).
pub fn goes_like_field(n: usize) -> DataField {
    let proj = goes_like_projection();

    // Scan-angle window covering roughly 10W-wide box around (-55, 12)
    let corners = [(-62.0, 5.0), (-62.0, 19.0), (-48.0, 5.0), (-48.0, 19.0)];
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    for (lon, lat) in corners {
        let (x, y) = proj
            .from_geographic(lon, lat)
            .expect("fixture window is visible from GOES-East");
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let xs = linspace(x_min, x_max, n);
    let ys_descending = {
        let mut ys = linspace(y_min, y_max, n);
        ys.reverse();
        ys
    };

    let data = plane_field(&xs, &ys_descending, GOES_PLANE_A, GOES_PLANE_B);

    let mut field = DataField::new("CMI", data, n, n)
        .expect("fixture shape is consistent")
        .with_attr("grid_mapping", "goes_imager_projection");
    field
        .insert_coord("x", Coord::new_1d("x", xs).with_attr("units", "rad"))
        .expect("x axis matches fixture shape");
    field
        .insert_coord(
            "y",
            Coord::new_1d("y", ys_descending).with_attr("units", "rad"),
        )
        .expect("y axis matches fixture shape");
    field
        .insert_coord(
            "goes_imager_projection",
            Coord::empty()
                .with_attr("grid_mapping_name", "geostationary")
                .with_attr("perspective_point_height", proj.perspective_point_height)
                .with_attr("semi_major_axis", proj.semi_major_axis)
                .with_attr("semi_minor_axis", proj.semi_minor_axis)
                .with_attr("longitude_of_projection_origin", proj.longitude_origin)
                .with_attr("latitude_of_projection_origin", proj.latitude_origin)
                .with_attr("sweep_angle_axis", "x"),
        )
        .expect("mapping container is dimensionless");
    field
}

/// [`goes_like_field`] with its x/y axes stored pre-multiplied into meters
/// (`units = "m"`), the other convention geostationary files ship in.
pub fn goes_like_field_meters(n: usize) -> DataField {
    let h = goes_like_projection().perspective_point_height;
    let mut field = goes_like_field(n);
    for name in ["x", "y"] {
        let values: Vec<f64> = field
            .coord(name)
            .expect("goes fixture has projection axes")
            .values
            .iter()
            .map(|v| v * h)
            .collect();
        field
            .insert_coord(name, Coord::new_1d(name, values).with_attr("units", "m"))
            .expect("axis matches fixture shape");
    }
    field
}

/// The projection used by [`goes_like_field`].
pub fn goes_like_projection() -> Geostationary {
    Geostationary::goes16()
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    values[n - 1] = stop;
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_fixture_shape() {
        let field = aligned_latlon_field((5.0, 20.0), (-70.0, -30.0), 0.5);
        assert_eq!(field.shape(), (30, 80));
        assert_eq!(field.y_dim(), "lat");
        assert!(field.dim_coord("lon").is_some());
    }

    #[test]
    fn test_goes_meters_fixture_axes() {
        let rad = goes_like_field(20);
        let meters = goes_like_field_meters(20);
        let h = goes_like_projection().perspective_point_height;

        let x_rad = &rad.dim_coord("x").unwrap().values;
        let x_m = meters.dim_coord("x").unwrap();
        assert_eq!(x_m.unit(), Some("m"));
        assert!((x_m.values[0] - x_rad[0] * h).abs() < 1e-6);
        // Same data, only the axis convention changes
        assert_eq!(rad.data(), meters.data());
    }

    #[test]
    fn test_goes_fixture_metadata() {
        let field = goes_like_field(50);
        assert_eq!(field.shape(), (50, 50));
        assert_eq!(field.attr_str("grid_mapping"), Some("goes_imager_projection"));
        assert!(field.dim_coord("y").unwrap().is_descending());

        let mapping = field.coord("goes_imager_projection").unwrap();
        assert_eq!(
            mapping.attrs.get("grid_mapping_name").unwrap().as_str(),
            Some("geostationary")
        );
    }
}
