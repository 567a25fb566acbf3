//! Row and dataset containers.
//!
//! A [`Row`] is a plain name-to-value map; rows in one dataset are not
//! required to share a key set, and a missing key reads as null during
//! evaluation. A [`Dataset`] pairs the rows with an ordered column list so
//! that renderers and exporters know how to lay the table out.

use std::collections::{BTreeSet, HashMap};

use crate::value::Value;

/// One record of a dataset: column name mapped to a scalar value.
pub type Row = HashMap<String, Value>;

/// An ordered, finite, in-memory table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names in display order.
    pub columns: Vec<String>,
    /// The rows, in insertion order.
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from an explicit column list and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset { columns, rows }
    }

    /// Create a dataset from rows alone; the column list is the union of
    /// all row keys, sorted by name.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut names = BTreeSet::new();
        for row in &rows {
            for key in row.keys() {
                names.insert(key.clone());
            }
        }
        Dataset {
            columns: names.into_iter().collect(),
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, Value)]) -> Row {
        cells
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_from_rows_unions_columns() {
        let dataset = Dataset::from_rows(vec![
            row(&[("b", Value::from(1)), ("a", Value::from(2))]),
            row(&[("c", Value::from(3))]),
        ]);
        assert_eq!(dataset.columns, vec!["a", "b", "c"]);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.columns.is_empty());
    }
}
