//! Query evaluation over in-memory rows.
//!
//! [`execute`] interprets a parsed [`Query`] against a primary row set and
//! an optional secondary row set (the join table). Evaluation runs through
//! fixed stages: join, filter, group-or-project, order, limit. Inputs are
//! never mutated; every result row is newly allocated.
//!
//! Evaluation itself never fails. Missing columns read as [`Value::Null`],
//! non-numeric aggregation input coerces to zero, and structurally odd
//! queries degrade to a best-effort result instead of raising. The only
//! fallible step in the pipeline is parsing.

use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::dataset::Row;
use crate::query::ast::{
    AggregateArg, AggregateFn, ColumnRef, ColumnSpec, CompareOp, CompareRhs, Condition, JoinKind,
    JoinSpec, OrderDirection, OrderSpec, Query,
};
use crate::value::Value;

/// Run a query against `primary`, with `secondary` as the join table.
///
/// An empty primary row set short-circuits to an empty result regardless
/// of the query shape. A join clause without supplied secondary rows is
/// skipped, leaving the primary rows unjoined.
pub fn execute(query: &Query, primary: &[Row], secondary: Option<&[Row]>) -> Vec<Row> {
    if primary.is_empty() {
        return Vec::new();
    }

    let mut rows = match (&query.join, secondary) {
        (Some(join), Some(secondary)) => join_rows(join, primary, secondary),
        (Some(join), None) => {
            debug!(
                table = %join.table,
                "join clause present but no secondary rows supplied; skipping join"
            );
            primary.to_vec()
        }
        (None, _) => primary.to_vec(),
    };

    if let Some(condition) = &query.where_clause {
        rows.retain(|row| eval_condition(condition, row));
    }

    let has_aggregate = query
        .columns
        .iter()
        .any(|spec| matches!(spec, ColumnSpec::Aggregate { .. }));

    let mut rows = if !query.group_by.is_empty() {
        group_rows(query, &rows)
    } else if has_aggregate {
        vec![aggregate_all(query, &rows)]
    } else {
        project_rows(&query.columns, rows)
    };

    if !query.order_by.is_empty() {
        sort_rows(&mut rows, &query.order_by);
    }

    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    rows
}

/// Look up a column in a row: the bare column name first, then the full
/// dotted form. Absent keys read as null.
fn resolve_column(row: &Row, column: &ColumnRef) -> Value {
    if let Some(value) = row.get(&column.column) {
        return value.clone();
    }
    if column.table.is_some() {
        if let Some(value) = row.get(&column.full_name()) {
            return value.clone();
        }
    }
    Value::Null
}

fn join_rows(join: &JoinSpec, primary: &[Row], secondary: &[Row]) -> Vec<Row> {
    if join.kind == JoinKind::Right {
        warn!("RIGHT JOIN is not implemented; returning primary rows unjoined");
        return primary.to_vec();
    }

    let mut joined = Vec::new();
    for row in primary {
        let left = resolve_column(row, &join.left);
        let matches: Vec<&Row> = secondary
            .iter()
            .filter(|candidate| left.loosely_equals(&resolve_column(candidate, &join.right)))
            .collect();

        if matches.is_empty() {
            if join.kind == JoinKind::Left {
                joined.push(merge_rows(row, &null_row_like(secondary.first())));
            }
        } else {
            for matched in matches {
                joined.push(merge_rows(row, matched));
            }
        }
    }
    joined
}

/// Shallow merge; secondary fields overwrite primary fields on collision.
fn merge_rows(primary: &Row, secondary: &Row) -> Row {
    let mut merged = primary.clone();
    for (key, value) in secondary {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// An all-null row with the template's keys. No template, no keys.
fn null_row_like(template: Option<&Row>) -> Row {
    match template {
        Some(row) => row.keys().map(|key| (key.clone(), Value::Null)).collect(),
        None => Row::new(),
    }
}

fn eval_condition(condition: &Condition, row: &Row) -> bool {
    match condition {
        Condition::And(left, right) => eval_condition(left, row) && eval_condition(right, row),
        Condition::Or(left, right) => eval_condition(left, row) || eval_condition(right, row),
        Condition::Not(inner) => !eval_condition(inner, row),
        Condition::Compare { column, op, rhs } => eval_compare(row, column, op, rhs),
    }
}

fn eval_compare(row: &Row, column: &ColumnRef, op: &CompareOp, rhs: &CompareRhs) -> bool {
    let actual = resolve_column(row, column);
    let target = match rhs {
        CompareRhs::Scalar(value) => value,
        CompareRhs::List(values) => values.first().unwrap_or(&Value::Null),
    };

    match op {
        CompareOp::Eq => actual.loosely_equals(target),
        CompareOp::NotEq => !actual.loosely_equals(target),
        CompareOp::Lt => actual.compare(target) == Ordering::Less,
        CompareOp::LtEq => actual.compare(target) != Ordering::Greater,
        CompareOp::Gt => actual.compare(target) == Ordering::Greater,
        CompareOp::GtEq => actual.compare(target) != Ordering::Less,
        CompareOp::Like => like_matches(&actual, target),
        CompareOp::In => match rhs {
            CompareRhs::List(values) => values.iter().any(|value| actual.loosely_equals(value)),
            CompareRhs::Scalar(value) => actual.loosely_equals(value),
        },
        CompareOp::Other(symbol) => {
            warn!(operator = %symbol, "unknown comparison operator; treating condition as satisfied");
            true
        }
    }
}

/// Case-insensitive LIKE: `%` matches any run, `_` matches one character,
/// everything else is literal. The pattern is anchored at both ends.
fn like_matches(actual: &Value, pattern: &Value) -> bool {
    let mut regex_text = String::from("(?i)^");
    for ch in pattern.to_string().chars() {
        match ch {
            '%' => regex_text.push_str(".*"),
            '_' => regex_text.push('.'),
            other => regex_text.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_text.push('$');

    match Regex::new(&regex_text) {
        Ok(re) => re.is_match(&actual.to_string()),
        Err(_) => false,
    }
}

/// Partition rows by their group-by key, preserving first-seen group
/// order, and collapse each group to one output row.
fn group_rows(query: &Query, rows: &[Row]) -> Vec<Row> {
    let mut buckets: HashMap<Vec<String>, Vec<Row>> = HashMap::new();
    let mut order: Vec<Vec<String>> = Vec::new();

    for row in rows {
        let key: Vec<String> = query
            .group_by
            .iter()
            .map(|column| group_key_part(&resolve_column(row, column)))
            .collect();
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(row.clone());
    }

    let mut result = Vec::new();
    for key in order {
        if let Some(group) = buckets.remove(&key) {
            result.push(grouped_row(query, &group));
        }
    }
    result
}

/// Bucketing renders each key component as text, with null spelled out so
/// it still forms a key.
fn group_key_part(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// One output row per group: the group-by columns' values from the
/// group's first row, plus one value per aggregate in the select list.
/// Plain select columns outside the group-by list are not materialized.
fn grouped_row(query: &Query, group: &[Row]) -> Row {
    let mut out = Row::new();
    if let Some(first) = group.first() {
        for column in &query.group_by {
            out.insert(column.full_name(), resolve_column(first, column));
        }
    }
    for spec in &query.columns {
        if let ColumnSpec::Aggregate {
            function, argument, ..
        } = spec
        {
            out.insert(spec.output_name(), eval_aggregate(*function, argument, group));
        }
    }
    out
}

/// Collapse the whole filtered row set into one row: aggregates computed
/// over every row, plain columns taken from the first row only.
fn aggregate_all(query: &Query, rows: &[Row]) -> Row {
    let mut out = Row::new();
    for spec in &query.columns {
        match spec {
            ColumnSpec::Aggregate {
                function, argument, ..
            } => {
                out.insert(spec.output_name(), eval_aggregate(*function, argument, rows));
            }
            ColumnSpec::Column { column, .. } => {
                let value = rows
                    .first()
                    .map(|row| resolve_column(row, column))
                    .unwrap_or(Value::Null);
                out.insert(spec.output_name(), value);
            }
            ColumnSpec::Wildcard => {}
        }
    }
    out
}

fn eval_aggregate(function: AggregateFn, argument: &AggregateArg, rows: &[Row]) -> Value {
    match function {
        AggregateFn::Count => match argument {
            AggregateArg::Wildcard => Value::Number(rows.len() as f64),
            AggregateArg::Column(column) => {
                let count = rows
                    .iter()
                    .filter(|row| !resolve_column(row, column).is_null())
                    .count();
                Value::Number(count as f64)
            }
        },
        AggregateFn::Sum => Value::Number(numeric_sum(argument, rows)),
        AggregateFn::Avg => {
            if rows.is_empty() {
                return Value::Null;
            }
            Value::Number(numeric_sum(argument, rows) / rows.len() as f64)
        }
        AggregateFn::Min => extremum(argument, rows, Ordering::Less),
        AggregateFn::Max => extremum(argument, rows, Ordering::Greater),
    }
}

/// Sum with numeric coercion; anything that does not parse counts as zero.
fn numeric_sum(argument: &AggregateArg, rows: &[Row]) -> f64 {
    rows.iter()
        .map(|row| aggregate_input(argument, row).as_number().unwrap_or(0.0))
        .sum()
}

fn aggregate_input(argument: &AggregateArg, row: &Row) -> Value {
    match argument {
        AggregateArg::Wildcard => Value::Null,
        AggregateArg::Column(column) => resolve_column(row, column),
    }
}

/// MIN/MAX over the non-null values, comparing numerically where both
/// sides parse and textually otherwise. Returns the original stored
/// value, not its coercion; ties keep the earlier row's value.
fn extremum(argument: &AggregateArg, rows: &[Row], keep: Ordering) -> Value {
    let mut best: Option<Value> = None;
    for row in rows {
        let value = aggregate_input(argument, row);
        if value.is_null() {
            continue;
        }
        best = match best {
            None => Some(value),
            Some(current) => {
                if value.compare(&current) == keep {
                    Some(value)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.unwrap_or(Value::Null)
}

fn project_rows(specs: &[ColumnSpec], rows: Vec<Row>) -> Vec<Row> {
    if let [ColumnSpec::Wildcard] = specs {
        return rows;
    }
    rows.iter().map(|row| project_row(specs, row)).collect()
}

fn project_row(specs: &[ColumnSpec], row: &Row) -> Row {
    let mut out = Row::new();
    for spec in specs {
        match spec {
            ColumnSpec::Wildcard => out.extend(row.clone()),
            ColumnSpec::Column { column, .. } => {
                out.insert(spec.output_name(), resolve_column(row, column));
            }
            ColumnSpec::Aggregate { .. } => {}
        }
    }
    out
}

/// Stable multi-key sort; earlier keys take priority and DESC reverses
/// the per-key ordering.
fn sort_rows(rows: &mut [Row], keys: &[OrderSpec]) {
    rows.sort_by(|a, b| {
        for key in keys {
            let ordering = resolve_column(a, &key.column).compare(&resolve_column(b, &key.column));
            let ordering = match key.direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
