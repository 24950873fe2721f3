//! In-memory carrier for a 2D gridded variable.
//!
//! A [`DataField`] is the unit the rest of the workspace operates on: a
//! row-major grid of values with two named dimensions, plus the coordinate
//! variables and attributes that came with it from whatever file format the
//! caller read. Coordinate variables may span one dimension (regular axes) or
//! both (auxiliary 2D lat/lon grids); a dimensionless coordinate can act as a
//! pure metadata container, which is how CF grid mappings travel.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};

/// An attribute value attached to a field or coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl AttrValue {
    /// Interpret the attribute as a single number.
    ///
    /// Single-element arrays collapse to their element, and text attributes
    /// that parse as a number are accepted; some producers write numeric
    /// projection parameters as strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Numbers(vs) if vs.len() == 1 => Some(vs[0]),
            AttrValue::Numbers(_) => None,
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the attribute as a list of numbers (scalars become length 1).
    pub fn as_f64_list(&self) -> Option<Vec<f64>> {
        match self {
            AttrValue::Number(v) => Some(vec![*v]),
            AttrValue::Numbers(vs) => Some(vs.clone()),
            AttrValue::Text(s) => s.trim().parse().ok().map(|v| vec![v]),
        }
    }

    /// Interpret the attribute as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(vs: Vec<f64>) -> Self {
        AttrValue::Numbers(vs)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// A coordinate variable.
///
/// `dims` names the field dimensions the values span, in order. A 1D
/// coordinate has one dimension, a 2D auxiliary coordinate has two (row
/// dimension first), and an empty `dims` marks a metadata-only container
/// variable with no values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub dims: Vec<String>,
    pub values: Vec<f64>,
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Coord {
    /// Create a 1D coordinate along a single dimension.
    pub fn new_1d(dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            dims: vec![dim.into()],
            values,
            attrs: BTreeMap::new(),
        }
    }

    /// Create a 2D auxiliary coordinate (row dimension first).
    pub fn new_2d(y_dim: impl Into<String>, x_dim: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            dims: vec![y_dim.into(), x_dim.into()],
            values,
            attrs: BTreeMap::new(),
        }
    }

    /// Create a dimensionless container variable (e.g. a CF grid mapping).
    pub fn empty() -> Self {
        Self {
            dims: Vec::new(),
            values: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Attach an attribute, returning the coordinate for chaining.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Number of dimensions the coordinate spans.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Whether this is a 1D coordinate.
    pub fn is_1d(&self) -> bool {
        self.dims.len() == 1
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the coordinate has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `units` attribute, if textual.
    pub fn unit(&self) -> Option<&str> {
        self.attrs.get("units").and_then(AttrValue::as_str)
    }

    /// Whether a 1D coordinate's values decrease along its dimension.
    pub fn is_descending(&self) -> bool {
        self.is_1d() && self.values.len() >= 2 && self.values[0] > self.values[self.values.len() - 1]
    }
}

/// A 2D gridded variable with named dimensions, coordinates and attributes.
///
/// Data is stored row-major with shape `(ny, nx)`; the row dimension is
/// `y_dim` and the column dimension is `x_dim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataField {
    /// Variable name (e.g. "phi", "CMI", "HT").
    pub name: String,
    data: Vec<f32>,
    ny: usize,
    nx: usize,
    y_dim: String,
    x_dim: String,
    coords: BTreeMap<String, Coord>,
    /// Variable attributes (units, grid_mapping, ...).
    pub attrs: BTreeMap<String, AttrValue>,
    /// Valid time of the field, when known.
    pub valid_time: Option<DateTime<Utc>>,
}

impl DataField {
    /// Create a new field with the default dimension names `("y", "x")`.
    pub fn new(name: impl Into<String>, data: Vec<f32>, ny: usize, nx: usize) -> Result<Self> {
        if data.len() != ny * nx {
            return Err(RegridError::shape_mismatch(
                format!("{} ({} x {})", ny * nx, ny, nx),
                data.len().to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            data,
            ny,
            nx,
            y_dim: "y".to_string(),
            x_dim: "x".to_string(),
            coords: BTreeMap::new(),
            attrs: BTreeMap::new(),
            valid_time: None,
        })
    }

    /// Rename the dimensions (row dimension first).
    ///
    /// Call before inserting coordinates; existing coordinates keep whatever
    /// dimension names they were created with.
    pub fn with_dims(mut self, y_dim: impl Into<String>, x_dim: impl Into<String>) -> Self {
        self.y_dim = y_dim.into();
        self.x_dim = x_dim.into();
        self
    }

    /// Attach an attribute, returning the field for chaining.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Grid shape as `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Row dimension name.
    pub fn y_dim(&self) -> &str {
        &self.y_dim
    }

    /// Column dimension name.
    pub fn x_dim(&self) -> &str {
        &self.x_dim
    }

    /// The raw values in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get the value at a grid position.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.ny || col >= self.nx {
            return None;
        }
        self.data.get(row * self.nx + col).copied()
    }

    /// Whether the field has a dimension with this name.
    pub fn has_dim(&self, dim: &str) -> bool {
        dim == self.y_dim || dim == self.x_dim
    }

    /// Length of a dimension by name.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        if dim == self.y_dim {
            Some(self.ny)
        } else if dim == self.x_dim {
            Some(self.nx)
        } else {
            None
        }
    }

    /// Insert a coordinate variable, validating it against the field shape.
    ///
    /// Every dimension the coordinate spans must be a field dimension, the
    /// value count must match the spanned lengths, and 2D coordinates must
    /// list the row dimension first.
    pub fn insert_coord(&mut self, name: impl Into<String>, coord: Coord) -> Result<()> {
        let name = name.into();
        match coord.dims.len() {
            0 => {}
            1 => {
                let dim = &coord.dims[0];
                let len = self.dim_len(dim).ok_or_else(|| {
                    RegridError::invalid_metadata(format!(
                        "coordinate `{}` spans unknown dimension `{}`",
                        name, dim
                    ))
                })?;
                if coord.values.len() != len {
                    return Err(RegridError::shape_mismatch(
                        format!("{} (dim `{}`)", len, dim),
                        coord.values.len().to_string(),
                    ));
                }
            }
            2 => {
                if coord.dims[0] != self.y_dim || coord.dims[1] != self.x_dim {
                    return Err(RegridError::invalid_metadata(format!(
                        "2D coordinate `{}` must span ({}, {}), got ({}, {})",
                        name, self.y_dim, self.x_dim, coord.dims[0], coord.dims[1]
                    )));
                }
                if coord.values.len() != self.ny * self.nx {
                    return Err(RegridError::shape_mismatch(
                        format!("{} ({} x {})", self.ny * self.nx, self.ny, self.nx),
                        coord.values.len().to_string(),
                    ));
                }
            }
            n => {
                return Err(RegridError::invalid_metadata(format!(
                    "coordinate `{}` has {} dimensions; at most 2 supported",
                    name, n
                )));
            }
        }
        self.coords.insert(name, coord);
        Ok(())
    }

    /// Look up a coordinate variable by name.
    pub fn coord(&self, name: &str) -> Option<&Coord> {
        self.coords.get(name)
    }

    /// Whether a coordinate with this name exists.
    pub fn has_coord(&self, name: &str) -> bool {
        self.coords.contains_key(name)
    }

    /// Names of all coordinate variables.
    pub fn coord_names(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(String::as_str)
    }

    /// The 1D coordinate that indexes a dimension (same name as the dim).
    pub fn dim_coord(&self, dim: &str) -> Option<&Coord> {
        self.coords
            .get(dim)
            .filter(|c| c.is_1d() && c.dims[0] == dim)
    }

    /// A textual attribute by name.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_str)
    }

    /// A numeric attribute by name.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(AttrValue::as_f64)
    }

    /// Extract a sub-region by index ranges, carrying coordinates along.
    ///
    /// 1D coordinates are sliced along their dimension, 2D coordinates along
    /// both, and dimensionless containers are copied unchanged.
    pub fn slice(&self, rows: Range<usize>, cols: Range<usize>) -> Result<DataField> {
        if rows.end > self.ny || cols.end > self.nx || rows.start > rows.end || cols.start > cols.end
        {
            return Err(RegridError::invalid_metadata(format!(
                "slice {:?} x {:?} out of bounds for shape ({}, {})",
                rows, cols, self.ny, self.nx
            )));
        }

        let ny = rows.end - rows.start;
        let nx = cols.end - cols.start;
        let mut data = Vec::with_capacity(ny * nx);
        for row in rows.clone() {
            let start = row * self.nx + cols.start;
            data.extend_from_slice(&self.data[start..start + nx]);
        }

        let mut out = DataField {
            name: self.name.clone(),
            data,
            ny,
            nx,
            y_dim: self.y_dim.clone(),
            x_dim: self.x_dim.clone(),
            coords: BTreeMap::new(),
            attrs: self.attrs.clone(),
            valid_time: self.valid_time,
        };

        for (name, coord) in &self.coords {
            let sliced = match coord.dims.len() {
                0 => coord.clone(),
                1 => {
                    let range = if coord.dims[0] == self.y_dim {
                        rows.clone()
                    } else {
                        cols.clone()
                    };
                    Coord {
                        dims: coord.dims.clone(),
                        values: coord.values[range].to_vec(),
                        attrs: coord.attrs.clone(),
                    }
                }
                _ => {
                    let mut values = Vec::with_capacity(ny * nx);
                    for row in rows.clone() {
                        let start = row * self.nx + cols.start;
                        values.extend_from_slice(&coord.values[start..start + nx]);
                    }
                    Coord {
                        dims: coord.dims.clone(),
                        values,
                        attrs: coord.attrs.clone(),
                    }
                }
            };
            out.coords.insert(name.clone(), sliced);
        }

        Ok(out)
    }
}
