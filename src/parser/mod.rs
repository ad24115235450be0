pub mod dims_parser;
pub use dims_parser::DimsParser;

use anyhow::Result;

use crate::schema::Dim;

pub fn parse_dims_string(text: &str) -> Result<Vec<Dim>> {
    dims_parser::parse_string(text)
}
