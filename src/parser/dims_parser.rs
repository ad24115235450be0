#![allow(clippy::empty_docs)]
#[derive(Parser)]
#[grammar = "parser/dims_grammar.pest"] // relative to src
pub struct DimsParser;

use anyhow::{anyhow, Result};
use pest::iterators::Pair;
use pest::Parser;

use crate::schema::Dim;

// integer = @{ ASCII_DIGIT+ }
// symbol  = @{ (ASCII_ALPHA | "_") ~ (ASCII_ALPHANUMERIC | "_")* }
fn parse_dim(pair: Pair<'_, Rule>) -> Result<Dim> {
    match pair.as_rule() {
        Rule::integer => {
            let size = pair
                .as_str()
                .parse::<usize>()
                .map_err(|e| anyhow!("invalid dimension size '{}': {}", pair.as_str(), e))?;
            Ok(Dim::Literal(size))
        }
        Rule::symbol => Ok(Dim::Symbol(pair.as_str().to_string())),
        _ => unreachable!("{:?}", pair.to_string()),
    }
}

pub fn parse_string(text: &str) -> Result<Vec<Dim>> {
    let main = DimsParser::parse(Rule::main, text)
        .map_err(|e| anyhow!("cannot parse dimensions '{}':\n{}", text, e))?
        .next()
        .unwrap();
    // main = { SOI ~ ("(" ~ dims ~ ")" | dims) ~ EOI }
    let dims = main
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::dims)
        .unwrap();
    dims.into_inner().map(parse_dim).collect()
}

#[cfg(test)]
mod tests {
    use super::parse_string;
    use crate::schema::Dim;

    #[test]
    fn mixed_dims() {
        let dims = parse_string("bn, p, 3, h, w").unwrap();
        assert_eq!(
            dims,
            vec![
                Dim::sym("bn"),
                Dim::sym("p"),
                Dim::lit(3),
                Dim::sym("h"),
                Dim::sym("w"),
            ]
        );
    }

    #[test]
    fn parenthesised_with_trailing_comma() {
        let dims = parse_string("(bn, 2,)").unwrap();
        assert_eq!(dims, vec![Dim::sym("bn"), Dim::lit(2)]);
    }

    #[test]
    fn scalar() {
        assert!(parse_string("").unwrap().is_empty());
        assert!(parse_string("()").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_string("bn, -1").is_err());
        assert!(parse_string("(bn, 2").is_err());
        assert!(parse_string("2bn").is_err());
        assert!(parse_string("bn,, 2").is_err());
        assert!(parse_string("99999999999999999999999999").is_err());
    }
}
