use std::fmt;

use anyhow::Result;
use ndarray::{ArrayBase, Dimension, RawData};

use super::{ArrayShape, Shape, ShapeError, ShapeSpec};

/// Declaration options for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOptions {
    pub dims: ShapeSpec,
    pub optional: bool,
    pub accepts_collection: bool,
}

impl FieldOptions {
    pub fn new(dims: ShapeSpec) -> Self {
        Self {
            dims,
            optional: false,
            accepts_collection: true,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn accepts_collection(mut self, accepts_collection: bool) -> Self {
        self.accepts_collection = accepts_collection;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    shape: ShapeSpec,
    optional: bool,
    accepts_collection: bool,
}

impl FieldSpec {
    pub fn new(name: &str, options: FieldOptions) -> Self {
        Self {
            name: name.to_string(),
            shape: options.dims,
            optional: options.optional,
            accepts_collection: options.accepts_collection,
        }
    }

    /// a required field that accepts a single array or a list, with dims given as text, e.g. `"bn, 2"`
    pub fn parse(name: &str, dims: &str) -> Result<Self> {
        Ok(Self::new(name, FieldOptions::new(dims.parse()?)))
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn shape(&self) -> &ShapeSpec {
        &self.shape
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn accepts_collection(&self) -> bool {
        self.accepts_collection
    }

    /// Reduce a supplied value to the concrete shape it is checked against.
    ///
    /// A list of `k` arrays of identical shape `(d1, ..., dn)` is treated as if stacked
    /// along a new leading axis, giving `(k, d1, ..., dn)`. Returns `Ok(None)` for an
    /// absent optional field, which is not checked any further.
    pub fn normalize(&self, value: &FieldValue<'_>) -> Result<Option<Shape>, ShapeError> {
        match value {
            FieldValue::Absent => {
                if self.optional {
                    Ok(None)
                } else {
                    Err(ShapeError::MissingField {
                        field: self.name.clone(),
                    })
                }
            }
            FieldValue::Single(array) => Ok(Some(Shape::from(array.shape().to_vec()))),
            FieldValue::Collection(_) if !self.accepts_collection => {
                Err(ShapeError::UnsupportedValueKind {
                    field: self.name.clone(),
                })
            }
            FieldValue::Collection(elmts) => self.normalize_collection(elmts).map(Some),
        }
    }

    fn normalize_collection(&self, elmts: &[FieldValue<'_>]) -> Result<Shape, ShapeError> {
        if elmts.is_empty() {
            return Err(ShapeError::EmptyCollection {
                field: self.name.clone(),
            });
        }
        let mut first: Option<&[usize]> = None;
        for (index, elmt) in elmts.iter().enumerate() {
            let shape = match elmt {
                FieldValue::Single(array) => array.shape(),
                _ => {
                    return Err(ShapeError::NotAnArray {
                        field: self.name.clone(),
                        index,
                    })
                }
            };
            match first {
                None => first = Some(shape),
                Some(expected) if expected != shape => {
                    return Err(ShapeError::InconsistentElementShape {
                        field: self.name.clone(),
                        index,
                        expected: Shape::from(expected.to_vec()),
                        actual: Shape::from(shape.to_vec()),
                    })
                }
                Some(_) => {}
            }
        }
        let mut stacked = Vec::with_capacity(self.shape.rank());
        stacked.push(elmts.len());
        stacked.extend_from_slice(first.unwrap_or_default());
        Ok(Shape::from(stacked))
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: TensorShape{}", self.name, self.shape)?;
        if self.optional {
            write!(f, " (optional)")?;
        }
        if !self.accepts_collection {
            write!(f, " (single array only)")?;
        }
        Ok(())
    }
}

/// The runtime value supplied for one field.
#[derive(Clone)]
pub enum FieldValue<'a> {
    Absent,
    Single(&'a dyn ArrayShape),
    Collection(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn single(array: &'a dyn ArrayShape) -> Self {
        FieldValue::Single(array)
    }

    pub fn collection<A: ArrayShape>(arrays: &'a [A]) -> Self {
        FieldValue::Collection(
            arrays
                .iter()
                .map(|a| FieldValue::Single(a as &dyn ArrayShape))
                .collect(),
        )
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => write!(f, "Absent"),
            FieldValue::Single(array) => write!(f, "Single({:?})", array.shape()),
            FieldValue::Collection(elmts) => f.debug_tuple("Collection").field(elmts).finish(),
        }
    }
}

/// Conversion from a record member to the value checked for its field.
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl<S: RawData, D: Dimension> AsFieldValue for ArrayBase<S, D> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Single(self)
    }
}

impl<T: AsFieldValue> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Collection(self.iter().map(AsFieldValue::as_field_value).collect())
    }
}

impl<T: AsFieldValue> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        self.as_slice().as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Absent,
        }
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

/// A batch supplied either already stacked into one array or as a list of arrays.
#[derive(Debug, Clone)]
pub enum Batched<A> {
    Stacked(A),
    List(Vec<A>),
}

impl<A: AsFieldValue> AsFieldValue for Batched<A> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Batched::Stacked(array) => array.as_field_value(),
            Batched::List(arrays) => arrays.as_field_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, ArrayD, IxDyn};

    use super::{AsFieldValue, Batched, FieldOptions, FieldSpec, FieldValue};
    use crate::schema::ShapeError;

    fn zeros(shape: &[usize]) -> ArrayD<f32> {
        ArrayD::zeros(IxDyn(shape))
    }

    fn field(dims: &str) -> FieldSpec {
        FieldSpec::parse("data", dims).unwrap()
    }

    #[test]
    fn options_defaults() {
        let options = FieldOptions::new("bn, 2".parse().unwrap());
        assert!(!options.optional);
        assert!(options.accepts_collection);
        let spec = FieldSpec::new("image_sizes", options.optional(true));
        assert!(spec.is_optional());
        assert!(spec.accepts_collection());
        assert_eq!(spec.name(), "image_sizes");
        assert_eq!(spec.shape().rank(), 2);
    }

    #[test]
    fn single_array_shape_is_used_directly() {
        let a = zeros(&[16, 2]);
        let shape = field("bn, 2").normalize(&a.as_field_value()).unwrap();
        assert_eq!(shape, Some(arr1(&[16, 2])));
    }

    #[test]
    fn collection_is_stacked() {
        let list = vec![zeros(&[2]); 16];
        let shape = field("bn, 2").normalize(&list.as_field_value()).unwrap();
        assert_eq!(shape, Some(arr1(&[16, 2])));
        let shape = field("bn")
            .normalize(&FieldValue::collection(&[zeros(&[]), zeros(&[])]))
            .unwrap();
        assert_eq!(shape, Some(arr1(&[2])));
    }

    #[test]
    fn absent_values() {
        let required = field("bn, 2");
        assert_eq!(
            required.normalize(&FieldValue::Absent),
            Err(ShapeError::MissingField {
                field: "data".to_string()
            })
        );
        let optional = FieldSpec::new("data", FieldOptions::new("bn, 2".parse().unwrap()).optional(true));
        assert_eq!(optional.normalize(&FieldValue::Absent), Ok(None));
        let none: Option<ArrayD<f32>> = None;
        assert!(none.as_field_value().is_absent());
    }

    #[test]
    fn empty_collection() {
        let list: Vec<ArrayD<f32>> = vec![];
        assert_eq!(
            field("bn, 2").normalize(&list.as_field_value()),
            Err(ShapeError::EmptyCollection {
                field: "data".to_string()
            })
        );
    }

    #[test]
    fn collection_holes_and_nesting_are_not_arrays() {
        let with_hole = vec![Some(zeros(&[2])), None];
        assert_eq!(
            field("bn, 2").normalize(&with_hole.as_field_value()),
            Err(ShapeError::NotAnArray {
                field: "data".to_string(),
                index: 1
            })
        );
        let nested = vec![vec![zeros(&[2])]];
        assert!(matches!(
            field("bn, 1, 2").normalize(&nested.as_field_value()),
            Err(ShapeError::NotAnArray { index: 0, .. })
        ));
    }

    #[test]
    fn inconsistent_elements() {
        let list = vec![zeros(&[64, 3, 32, 32]), zeros(&[64, 3, 16, 16])];
        assert_eq!(
            field("bn, p, 3, h, w").normalize(&list.as_field_value()),
            Err(ShapeError::InconsistentElementShape {
                field: "data".to_string(),
                index: 1,
                expected: arr1(&[64, 3, 32, 32]),
                actual: arr1(&[64, 3, 16, 16]),
            })
        );
    }

    #[test]
    fn collection_rejected_when_not_accepted() {
        let spec = FieldSpec::new(
            "data",
            FieldOptions::new("bn, 2".parse().unwrap()).accepts_collection(false),
        );
        let list = vec![zeros(&[2])];
        assert_eq!(
            spec.normalize(&list.as_field_value()),
            Err(ShapeError::UnsupportedValueKind {
                field: "data".to_string()
            })
        );
        let a = zeros(&[1, 2]);
        assert!(spec.normalize(&a.as_field_value()).is_ok());
    }

    #[test]
    fn batched_values() {
        let stacked = Batched::Stacked(zeros(&[16, 2]));
        let list = Batched::List(vec![zeros(&[2]); 16]);
        let spec = field("bn, 2");
        assert_eq!(
            spec.normalize(&stacked.as_field_value()),
            spec.normalize(&list.as_field_value())
        );
    }

    #[test]
    fn display() {
        let spec = FieldSpec::new(
            "image_sizes",
            FieldOptions::new("bn, 2".parse().unwrap()).optional(true),
        );
        assert_eq!(spec.to_string(), "image_sizes: TensorShape(bn, 2) (optional)");
    }
}
