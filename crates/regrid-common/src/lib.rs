//! Common types shared across the regrid workspace.

pub mod bbox;
pub mod error;
pub mod field;
pub mod method;

pub use bbox::LatLonBox;
pub use error::{RegridError, Result};
pub use field::{AttrValue, Coord, DataField};
pub use method::InterpolationMethod;
