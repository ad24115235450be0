extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod parser;
pub mod schema;

pub use schema::{
    validate, ArrayShape, AsFieldValue, Batched, Dim, FieldOptions, FieldSpec, FieldValue, Schema,
    SchemaInputs, ShapeError, ShapeSpec, TensorSchema, ValidationErrors, ValidationMode, Validator,
};
