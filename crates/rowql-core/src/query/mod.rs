//! Query language front end and execution engine.
//!
//! A query string flows through [`lexer::Lexer`] to tokens, through
//! [`parser::Parser`] to a [`Query`] AST, and through
//! [`executor::execute`] to result rows. The lexer and parser have no
//! dependency on evaluation; the evaluator depends only on the AST
//! shape.

pub mod ast;
pub mod executor;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use executor::execute;
pub use lexer::{Lexer, Token};
pub use parser::{ParseError, Parser};

use crate::dataset::Row;

/// Parse a query string in the default, permissive mode.
pub fn parse_query(input: &str) -> Result<Query, ParseError> {
    Parser::new(input).parse()
}

/// Parse a query string in strict mode: clauses accepted in any order,
/// duplicates rejected, and trailing input rejected.
pub fn parse_query_strict(input: &str) -> Result<Query, ParseError> {
    Parser::strict(input).parse()
}

/// Parse and run a query in one call.
///
/// The caller supplies the primary rows directly; `secondary` is the
/// join table, when the query has a JOIN clause. Only parsing can fail.
pub fn run_query(
    input: &str,
    primary: &[Row],
    secondary: Option<&[Row]>,
) -> crate::error::Result<Vec<Row>> {
    let query = parse_query(input)?;
    Ok(execute(&query, primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(cells: &[(&str, Value)]) -> Row {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_run_query_end_to_end() {
        let rows = vec![
            row(&[("name", "Ada".into()), ("age", 36.into())]),
            row(&[("name", "Bob".into()), ("age", 19.into())]),
        ];
        let result = run_query("SELECT name FROM people WHERE age > 21", &rows, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("name"), Some(&Value::text("Ada")));
    }

    #[test]
    fn test_run_query_propagates_parse_errors() {
        let err = run_query("SELECT COUNT FROM t", &[], None).unwrap_err();
        assert!(matches!(err, crate::error::Error::Parse(_)));
    }

    #[test]
    fn test_strict_parse_rejects_what_permissive_ignores() {
        let input = "SELECT * FROM t LIMIT 1 garbage";
        assert!(parse_query(input).is_ok());
        assert!(parse_query_strict(input).is_err());
    }
}
