use std::fmt;
use std::fmt::Write;

use thiserror::Error;

use super::Shape;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{field} is required but was not supplied")]
    MissingField { field: String },

    #[error("{field} must be a single array or a list of arrays")]
    UnsupportedValueKind { field: String },

    #[error("{field} was supplied as an empty list")]
    EmptyCollection { field: String },

    #[error("{field}[{index}] is not an array")]
    NotAnArray { field: String, index: usize },

    #[error("{field}[{index}] has shape {actual} but {field}[0] has shape {expected}")]
    InconsistentElementShape {
        field: String,
        index: usize,
        expected: Shape,
        actual: Shape,
    },

    #[error("{field} has rank {actual_rank} but expected {expected_rank}")]
    RankMismatch {
        field: String,
        expected_rank: usize,
        actual_rank: usize,
    },

    #[error("{field} dim[{axis}] expected {expected}, got {actual}")]
    DimensionMismatch {
        field: String,
        axis: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{field} dim[{axis}] expected {symbol}={bound}, got {actual}")]
    SymbolMismatch {
        field: String,
        axis: usize,
        symbol: String,
        bound: usize,
        actual: usize,
    },
}

impl ShapeError {
    pub fn field(&self) -> &str {
        match self {
            ShapeError::MissingField { field }
            | ShapeError::UnsupportedValueKind { field }
            | ShapeError::EmptyCollection { field }
            | ShapeError::NotAnArray { field, .. }
            | ShapeError::InconsistentElementShape { field, .. }
            | ShapeError::RankMismatch { field, .. }
            | ShapeError::DimensionMismatch { field, .. }
            | ShapeError::SymbolMismatch { field, .. } => field.as_str(),
        }
    }
}

/// Every failure found by one validation pass, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ShapeError>,
}

impl ValidationErrors {
    pub fn push(&mut self, new: ShapeError) {
        self.errors.push(new);
    }

    pub fn extend(&mut self, new: Vec<ShapeError>) {
        self.errors.extend(new)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<&ShapeError> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ShapeError> {
        self.errors
    }

    pub fn as_error_message(&self, schema_name: &str) -> String {
        let mut buf = format!("{} failed validation:\n", schema_name);
        for err in self.errors.iter() {
            writeln!(buf, "  {}: {}", err.field(), err).unwrap();
        }
        buf
    }

    pub fn has_error_contains(&self, text: &str) -> bool {
        self.errors.iter().any(|err| err.to_string().contains(text))
    }
}

impl From<ShapeError> for ValidationErrors {
    fn from(err: ShapeError) -> Self {
        Self { errors: vec![err] }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ShapeError;
    type IntoIter = std::vec::IntoIter<ShapeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "Error: {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
