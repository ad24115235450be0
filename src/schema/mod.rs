pub mod binding;
pub use binding::{BindingConflict, ShapeBinding};

pub mod definition;
pub use definition::{Schema, SchemaInputs, TensorSchema};

pub mod error;
pub use error::{ShapeError, ValidationErrors};

pub mod field;
pub use field::{AsFieldValue, Batched, FieldOptions, FieldSpec, FieldValue};

pub mod shape;
pub use shape::{ArrayShape, Dim, Shape, ShapeSpec};

pub mod validator;
pub use validator::{validate, ValidationMode, Validator};
