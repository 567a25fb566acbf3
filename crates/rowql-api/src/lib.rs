//! # rowql
//!
//! A compact, SQL-like query engine for in-memory tables of
//! loosely-typed rows.
//!
//! Queries are plain text: `SELECT`, optional `FROM`, `WHERE`,
//! `ORDER BY`, `GROUP BY`, a two-table `JOIN`, and `LIMIT`. Rows are
//! maps from column name to a scalar [`Value`] (null, number, or text),
//! and rows in one dataset are not required to share a key set: a
//! missing column simply reads as null. Evaluation never fails —
//! unparseable numbers coerce, unknown columns go null, and odd query
//! shapes degrade to a best-effort result. Only parsing returns errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowql::{Dataset, Row, Value, Workbook};
//!
//! let mut row = Row::new();
//! row.insert("name".to_string(), Value::text("Ada"));
//! row.insert("age".to_string(), Value::Number(36.0));
//!
//! let mut workbook = Workbook::new();
//! workbook.insert("people", Dataset::from_rows(vec![row]));
//!
//! let rows = workbook.query("SELECT name FROM people WHERE age > 21")?;
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].get("name"), Some(&Value::text("Ada")));
//! # Ok::<(), rowql::Error>(())
//! ```
//!
//! ## Features
//!
//! - Tokenizer, single-lookahead recursive-descent parser, and a staged
//!   evaluator (join, filter, group/aggregate, order, limit)
//! - Loose typing: numeric strings compare numerically, everything else
//!   textually; aggregation coerces with a parse-the-prefix rule
//! - `COUNT`, `SUM`, `AVG`, `MIN`, `MAX`, grouped or over the whole set
//! - Deterministic stable multi-key ordering
//! - CSV (`;`-delimited) and JSON export of results ([`export`])
//! - An opt-in strict parse mode that accepts clauses in any order and
//!   rejects trailing input ([`Workbook::query_strict`])

use std::collections::HashMap;

// Re-export core types
pub use rowql_core::{
    execute, parse_query, parse_query_strict, run_query, Dataset, Error, ParseError, Parser,
    Query, Result, Row, Value,
};

use rowql_core::query::ColumnSpec;

pub mod export;
pub mod logging;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A named collection of datasets that queries run against.
///
/// `FROM` and `JOIN` clauses name datasets registered here. Queries
/// never mutate the stored datasets; every result row is newly
/// allocated.
///
/// # Examples
///
/// ```rust
/// use rowql::{Dataset, Row, Value, Workbook};
///
/// let mut row = Row::new();
/// row.insert("title".to_string(), Value::text("Dune"));
///
/// let mut workbook = Workbook::new();
/// workbook.insert("books", Dataset::from_rows(vec![row]));
/// assert_eq!(workbook.dataset_names(), vec!["books".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct Workbook {
    datasets: HashMap<String, Dataset>,
}

impl Workbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
        }
    }

    /// Registers a dataset under a name, replacing any previous dataset
    /// with that name.
    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) {
        self.datasets.insert(name.into(), dataset);
    }

    /// Looks up a registered dataset.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Removes a dataset, returning it if it was registered.
    pub fn remove(&mut self, name: &str) -> Option<Dataset> {
        self.datasets.remove(name)
    }

    /// The registered dataset names, sorted.
    pub fn dataset_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Parses and runs a query, returning the result rows.
    ///
    /// Parsing uses the default permissive mode: clauses are recognized
    /// in the fixed order `FROM, WHERE, ORDER BY, GROUP BY, JOIN,
    /// LIMIT`, and out-of-order clauses or trailing text are silently
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] for malformed query text, [`Error::MissingFrom`]
    /// when the query has no `FROM` clause, and
    /// [`Error::DatasetNotFound`] when `FROM` or `JOIN` names an
    /// unregistered dataset.
    pub fn query(&self, input: &str) -> Result<Vec<Row>> {
        let query = parse_query(input)?;
        self.run(&query)
    }

    /// Like [`Workbook::query`], but parses in strict mode: clauses in
    /// any order, duplicate clauses rejected, and trailing input
    /// rejected.
    pub fn query_strict(&self, input: &str) -> Result<Vec<Row>> {
        let query = parse_query_strict(input)?;
        self.run(&query)
    }

    /// Parses and runs a query, returning a [`Dataset`] whose column
    /// list describes the result shape (useful for rendering or
    /// export).
    pub fn query_table(&self, input: &str) -> Result<Dataset> {
        let query = parse_query(input)?;
        let columns = self.result_columns(&query)?;
        let rows = self.run(&query)?;
        Ok(Dataset::new(columns, rows))
    }

    fn primary(&self, query: &Query) -> Result<&Dataset> {
        let name = query.from.as_ref().ok_or(Error::MissingFrom)?;
        self.datasets
            .get(name)
            .ok_or_else(|| Error::DatasetNotFound(name.clone()))
    }

    fn run(&self, query: &Query) -> Result<Vec<Row>> {
        let primary = self.primary(query)?;
        let secondary = match &query.join {
            Some(join) => Some(
                self.datasets
                    .get(&join.table)
                    .ok_or_else(|| Error::DatasetNotFound(join.table.clone()))?,
            ),
            None => None,
        };
        Ok(execute(
            query,
            &primary.rows,
            secondary.map(|dataset| dataset.rows.as_slice()),
        ))
    }

    /// Column names of a query's result table.
    ///
    /// Grouped queries produce the group-by columns followed by the
    /// aggregates; `SELECT *` reports the primary dataset's columns
    /// (plus the join table's, when joined); everything else uses the
    /// select list's output names.
    fn result_columns(&self, query: &Query) -> Result<Vec<String>> {
        if !query.group_by.is_empty() {
            let mut columns: Vec<String> = query
                .group_by
                .iter()
                .map(|column| column.full_name())
                .collect();
            for spec in &query.columns {
                if matches!(spec, ColumnSpec::Aggregate { .. }) {
                    columns.push(spec.output_name());
                }
            }
            return Ok(columns);
        }

        if let [ColumnSpec::Wildcard] = query.columns.as_slice() {
            let primary = self.primary(query)?;
            let mut columns = primary.columns.clone();
            if let Some(join) = &query.join {
                if let Some(secondary) = self.datasets.get(&join.table) {
                    for column in &secondary.columns {
                        if !columns.contains(column) {
                            columns.push(column.clone());
                        }
                    }
                }
            }
            return Ok(columns);
        }

        Ok(query
            .columns
            .iter()
            .map(|spec| spec.output_name())
            .collect())
    }
}
