use std::fmt;

use anyhow::{anyhow, Result};
use itertools::Itertools;

use super::{validator, FieldSpec, FieldValue, ShapeError, ValidationErrors, ValidationMode, Validator};

/// An ordered list of field declarations, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Result<Self> {
        if let Some(field) = fields.iter().find(|f| f.name().is_empty()) {
            return Err(anyhow!("schema {} has a field with an empty name: {}", name, field));
        }
        if let Some(dup) = fields.iter().map(FieldSpec::name).duplicates().next() {
            return Err(anyhow!("schema {} declares field {} more than once", name, dup));
        }
        Ok(Self {
            name: name.to_string(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        self.fields.as_slice()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shapes in {}:", self.name)?;
        for field in self.fields.iter() {
            write!(f, "\n  {}", field)?;
        }
        Ok(())
    }
}

/// A caller-owned record holding the values supplied for a schema's fields.
///
/// Names the record does not hold are reported as [`FieldValue::Absent`].
pub trait SchemaInputs {
    fn value(&self, field: &str) -> FieldValue<'_>;
}

/// A record type tied to a single static schema declaration.
pub trait TensorSchema: SchemaInputs {
    fn schema() -> &'static Schema;

    fn validate(&self) -> Result<(), ShapeError>
    where
        Self: Sized,
    {
        validator::validate(Self::schema(), self)
    }

    fn validate_all(&self) -> Result<(), ValidationErrors>
    where
        Self: Sized,
    {
        Validator::new(ValidationMode::Aggregate).validate(Self::schema(), self)
    }
}
