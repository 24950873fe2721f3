//! Coordinate reference system transformations.
//!
//! Implements the map projections gridded scientific datasets commonly carry
//! in their CF `grid_mapping` metadata, plus the parsing that turns that
//! metadata into a usable [`Crs`] value. Projections are implemented from
//! scratch without external dependencies.

pub mod azimuthal;
pub mod cf;
pub mod crs;
pub mod geostationary;
pub mod lambert;

pub use azimuthal::AzimuthalEqualArea;
pub use cf::parse_cf;
pub use crs::{Crs, ProjectionError};
pub use geostationary::Geostationary;
pub use lambert::LambertConformal;
