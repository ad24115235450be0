use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use itertools::Itertools;
use ndarray::{Array1, ArrayBase, Dimension, RawData};

use crate::parser::parse_dims_string;

/// Concrete extents of a supplied value, one entry per axis.
pub type Shape = Array1<usize>;

/// The only capability the validator needs from an array type: its extents.
pub trait ArrayShape {
    fn shape(&self) -> &[usize];

    fn rank(&self) -> usize {
        self.shape().len()
    }
}

impl<S: RawData, D: Dimension> ArrayShape for ArrayBase<S, D> {
    fn shape(&self) -> &[usize] {
        ArrayBase::shape(self)
    }
}

/// One axis of a declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dim {
    Literal(usize),
    Symbol(String),
}

impl Dim {
    pub fn lit(size: usize) -> Self {
        Dim::Literal(size)
    }

    pub fn sym(name: &str) -> Self {
        Dim::Symbol(name.to_string())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Dim::Symbol(name) => Some(name.as_str()),
            Dim::Literal(_) => None,
        }
    }
}

impl From<usize> for Dim {
    fn from(size: usize) -> Self {
        Dim::Literal(size)
    }
}

impl From<&str> for Dim {
    fn from(name: &str) -> Self {
        Dim::sym(name)
    }
}

impl From<String> for Dim {
    fn from(name: String) -> Self {
        Dim::Symbol(name)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Literal(size) => write!(f, "{}", size),
            Dim::Symbol(name) => write!(f, "{}", name),
        }
    }
}

/// The expected shape of one field: an ordered, immutable list of dimension terms.
///
/// A rank zero spec only matches scalar values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSpec {
    dims: Vec<Dim>,
}

impl ShapeSpec {
    pub fn new<I, D>(dims: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dim>,
    {
        Self {
            dims: dims.into_iter().map(Into::into).collect(),
        }
    }

    pub fn scalar() -> Self {
        Self { dims: Vec::new() }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn term_at(&self, axis: usize) -> Result<&Dim> {
        self.dims.get(axis).ok_or_else(|| {
            anyhow!(
                "axis {} out of range for shape {} of rank {}",
                axis,
                self,
                self.rank()
            )
        })
    }

    pub fn dims(&self) -> &[Dim] {
        self.dims.as_slice()
    }

    /// distinct symbol names, in order of first appearance
    pub fn symbols(&self) -> Vec<&str> {
        self.dims.iter().filter_map(Dim::as_symbol).unique().collect()
    }
}

impl FromStr for ShapeSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            dims: parse_dims_string(s)?,
        })
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.dims.iter().join(", "))
    }
}
