//! # rowql Core
//!
//! Core implementation of the rowql query engine: a compact, SQL-like
//! query language over in-memory tables of loosely-typed rows.
//!
//! A query string is tokenized by [`query::Lexer`], parsed into a
//! [`query::Query`] AST by [`query::Parser`] with one token of
//! lookahead, and evaluated by [`query::execute`] against a primary row
//! set and an optional secondary row set for joins. Evaluation filters,
//! joins, groups and aggregates, orders, and limits; it never mutates
//! its inputs and never fails, degrading to nulls and zeros where data
//! does not fit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod error;
pub mod query;
pub mod value;

pub use dataset::{Dataset, Row};
pub use error::{Error, Result};
pub use query::{
    execute, parse_query, parse_query_strict, run_query, ParseError, Parser, Query,
};
pub use value::Value;
