//! Coordinate resolution, domain cropping and regridding for gridded
//! scientific datasets.
//!
//! Given a 2D gridded variable that carries its geography in any of the
//! common forms, this crate can crop it to a local domain and resample it
//! onto a regular Cartesian grid:
//!
//! - direct 1D `lat`/`lon` coordinate axes
//! - auxiliary 2D `lat`/`lon` coordinate grids
//! - projection coordinates plus CF `grid_mapping` metadata
//!
//! # Pipeline
//!
//! ```text
//! DataField (any geography)
//!      │
//!      ├─► resolve_latlon / parse_cf     (which form is this?)
//!      │
//!      ├─► crop_field_to_domain          (bounded sub-region, padded)
//!      │
//!      └─► resample                      (engine seam, regular output grid)
//!               │
//!               ▼
//!          DataField on the domain grid (x/y meters + 2D lat/lon)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use regrid::{crop_field_to_domain, resample, LocalCartesianDomain};
//! use regrid_common::InterpolationMethod;
//!
//! let domain = LocalCartesianDomain::new(12.0, -55.0, 200.0e3, 100.0e3)?;
//! let cropped = crop_field_to_domain(&domain, &field, 0.1)?;
//! let local = resample(&domain, &cropped, 10.0e3, InterpolationMethod::Bilinear, false)?;
//! ```

pub mod config;
pub mod coords;
pub mod crop;
pub mod domain;
pub mod engine;
pub mod kernels;
pub mod resample;

// Re-export commonly used types at crate root
pub use config::RegridConfig;
pub use coords::{
    has_latlon_coords, latlon_coords_using_crs, on_latlon_aligned_grid, resolve_latlon,
    LatLonCoords,
};
pub use crop::{crop_field_to_bbox, crop_field_to_cartesian_domain, crop_field_to_domain};
pub use domain::{CartesianDomain, LocalCartesianDomain, TargetGrid};
pub use engine::{BuiltinEngine, RegridEngine, SourceGeometry, SourceGrid};
pub use kernels::{bilinear_sample, cubic_sample, nearest_sample};
pub use resample::{crop_and_resample, resample, resample_cartesian, resample_with_engine};

pub use regrid_common::{
    AttrValue, Coord, DataField, InterpolationMethod, LatLonBox, RegridError, Result,
};
