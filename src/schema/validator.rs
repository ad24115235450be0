use log::debug;

use super::{
    BindingConflict, Dim, FieldSpec, FieldValue, Schema, SchemaInputs, ShapeBinding, ShapeError,
    ValidationErrors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// stop at the first field that fails
    #[default]
    FailFast,
    /// report one error for every failing field
    Aggregate,
}

/// Checks schema instances against their declared shapes.
///
/// Every call to [`Validator::validate`] starts from an empty [`ShapeBinding`], so a
/// validator holds no state between calls and can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: ValidationMode,
}

impl Validator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn validate<I: SchemaInputs + ?Sized>(
        &self,
        schema: &Schema,
        inputs: &I,
    ) -> Result<(), ValidationErrors> {
        debug!("validating {} ({:?})", schema.name(), self.mode);
        let mut binding = ShapeBinding::new();
        let mut errs = ValidationErrors::default();
        for field in schema.fields() {
            if let Err(e) = check_field(field, &inputs.value(field.name()), &mut binding) {
                debug!("{}", e);
                errs.push(e);
                if self.mode == ValidationMode::FailFast {
                    break;
                }
            }
        }
        if errs.is_empty() {
            Ok(())
        } else {
            Err(errs)
        }
    }
}

/// Fail-fast validation, returning the first failure in field declaration order.
pub fn validate<I: SchemaInputs + ?Sized>(schema: &Schema, inputs: &I) -> Result<(), ShapeError> {
    let mut binding = ShapeBinding::new();
    for field in schema.fields() {
        check_field(field, &inputs.value(field.name()), &mut binding)?;
    }
    Ok(())
}

// symbols bound by a field only reach `binding` once the whole field has passed
fn check_field(
    field: &FieldSpec,
    value: &FieldValue<'_>,
    binding: &mut ShapeBinding,
) -> Result<(), ShapeError> {
    let shape = match field.normalize(value)? {
        Some(shape) => shape,
        None => {
            debug!("skipping absent optional field {}", field.name());
            return Ok(());
        }
    };
    debug!("checking {} with shape {} against {}", field.name(), shape, field.shape());

    let spec = field.shape();
    if shape.len() != spec.rank() {
        return Err(ShapeError::RankMismatch {
            field: field.name().to_string(),
            expected_rank: spec.rank(),
            actual_rank: shape.len(),
        });
    }

    let mut scratch = binding.clone();
    for (axis, (dim, &actual)) in spec.dims().iter().zip(shape.iter()).enumerate() {
        match dim {
            Dim::Literal(expected) => {
                if *expected != actual {
                    return Err(ShapeError::DimensionMismatch {
                        field: field.name().to_string(),
                        axis,
                        expected: *expected,
                        actual,
                    });
                }
            }
            Dim::Symbol(symbol) => {
                scratch.resolve(symbol, actual).map_err(
                    |BindingConflict {
                         symbol,
                         bound,
                         observed,
                     }| ShapeError::SymbolMismatch {
                        field: field.name().to_string(),
                        axis,
                        symbol,
                        bound,
                        actual: observed,
                    },
                )?;
            }
        }
    }
    *binding = scratch;
    Ok(())
}
