//! Error types for rowql.

use std::fmt;

use crate::query::parser::ParseError;

/// The main error type for rowql operations.
///
/// Only query parsing and result export can fail; query evaluation
/// itself degrades instead of erroring.
#[derive(Debug)]
pub enum Error {
    /// The query text could not be parsed.
    Parse(ParseError),

    /// A FROM or JOIN clause named a dataset that is not registered.
    DatasetNotFound(String),

    /// The query has no FROM clause, so there is no dataset to run
    /// against.
    MissingFrom,

    /// Result serialization failed.
    Export(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::DatasetNotFound(name) => write!(f, "Dataset not found: '{}'", name),
            Error::MissingFrom => write!(f, "Query has no FROM clause"),
            Error::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

/// A specialized `Result` type for rowql operations.
pub type Result<T> = std::result::Result<T, Error>;
