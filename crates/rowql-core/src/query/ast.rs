//! Abstract syntax tree for parsed queries.
//!
//! Every clause is modeled as a closed enum or struct so the evaluator's
//! pattern matches stay exhaustive. The `Display` impls render a query
//! back into canonical text, which the demos and debug logging use.

use std::fmt;

use crate::value::Value;

/// A possibly qualified column reference.
///
/// Written names are split at the first dot, so `users.name` has table
/// `users` and column `name`. Resolution against a row tries the bare
/// column name first, then the full dotted form.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Qualifier before the first dot, when present.
    pub table: Option<String>,
    /// Bare column name.
    pub column: String,
}

impl ColumnRef {
    /// Split a written column name at the first dot.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((table, column)) => ColumnRef {
                table: Some(table.to_string()),
                column: column.to_string(),
            },
            None => ColumnRef {
                table: None,
                column: raw.to_string(),
            },
        }
    }

    /// The written form: `table.column`, or the bare column name.
    pub fn full_name(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Aggregate functions available in the select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    /// Row count, or non-null count for a named column.
    Count,
    /// Numeric sum; non-numeric input counts as zero.
    Sum,
    /// Numeric mean over the whole group.
    Avg,
    /// Smallest non-null value.
    Min,
    /// Largest non-null value.
    Max,
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFn::Count => write!(f, "COUNT"),
            AggregateFn::Sum => write!(f, "SUM"),
            AggregateFn::Avg => write!(f, "AVG"),
            AggregateFn::Min => write!(f, "MIN"),
            AggregateFn::Max => write!(f, "MAX"),
        }
    }
}

/// Argument of an aggregate call.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateArg {
    /// `COUNT(*)` style whole-row argument.
    Wildcard,
    /// A named column.
    Column(ColumnRef),
}

impl fmt::Display for AggregateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateArg::Wildcard => write!(f, "*"),
            AggregateArg::Column(column) => write!(f, "{}", column),
        }
    }
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSpec {
    /// `SELECT *` — pass rows through unchanged.
    Wildcard,
    /// A plain or aliased column.
    Column {
        /// The referenced column.
        column: ColumnRef,
        /// Output name override from `AS`.
        alias: Option<String>,
    },
    /// An aggregate call such as `SUM(amount) AS total`.
    Aggregate {
        /// The aggregate function.
        function: AggregateFn,
        /// The aggregated column, or `*`.
        argument: AggregateArg,
        /// Output name override from `AS`.
        alias: Option<String>,
    },
}

impl ColumnSpec {
    /// The key this entry produces in result rows: the alias when one was
    /// written, else the written column text, else `FN(arg)` for
    /// aggregates.
    pub fn output_name(&self) -> String {
        match self {
            ColumnSpec::Wildcard => "*".to_string(),
            ColumnSpec::Column { column, alias } => alias
                .clone()
                .unwrap_or_else(|| column.full_name()),
            ColumnSpec::Aggregate {
                function,
                argument,
                alias,
            } => alias
                .clone()
                .unwrap_or_else(|| format!("{}({})", function, argument)),
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::Wildcard => write!(f, "*"),
            ColumnSpec::Column { column, alias } => {
                write!(f, "{}", column)?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", alias)?;
                }
                Ok(())
            }
            ColumnSpec::Aggregate {
                function,
                argument,
                alias,
            } => {
                write!(f, "{}({})", function, argument)?;
                if let Some(alias) = alias {
                    write!(f, " AS {}", alias)?;
                }
                Ok(())
            }
        }
    }
}

/// Comparison operators usable in a WHERE leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareOp {
    /// `=` or `==`: loose equality.
    Eq,
    /// `!=` or `<>`: loose inequality.
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE` pattern match with `%` and `_` wildcards.
    Like,
    /// `IN` membership in a literal list.
    In,
    /// Any other operator symbol the lexer produced, such as a bare `!`.
    /// The evaluator logs these and treats the comparison as satisfied.
    Other(String),
}

impl CompareOp {
    /// Map an operator token's symbol to a variant.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "=" | "==" => CompareOp::Eq,
            "!=" | "<>" => CompareOp::NotEq,
            "<" => CompareOp::Lt,
            "<=" => CompareOp::LtEq,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::GtEq,
            other => CompareOp::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::LtEq => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::GtEq => write!(f, ">="),
            CompareOp::Like => write!(f, "LIKE"),
            CompareOp::In => write!(f, "IN"),
            CompareOp::Other(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Right-hand side of a comparison: one scalar, or the literal list of an
/// `IN`.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareRhs {
    /// A single literal value.
    Scalar(Value),
    /// An ordered literal list.
    List(Vec<Value>),
}

impl fmt::Display for CompareRhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareRhs::Scalar(value) => write!(f, "{}", value),
            CompareRhs::List(values) => {
                write!(f, "(")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A boolean expression node in a WHERE clause.
///
/// AND and OR carry no precedence: the parser folds terms left to right in
/// textual order, so `a OR b AND c` is `(a OR b) AND c`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Both sides must hold.
    And(Box<Condition>, Box<Condition>),
    /// Either side must hold.
    Or(Box<Condition>, Box<Condition>),
    /// Negation.
    Not(Box<Condition>),
    /// A leaf comparison.
    Compare {
        /// The compared column.
        column: ColumnRef,
        /// The comparison operator.
        op: CompareOp,
        /// The literal(s) compared against.
        rhs: CompareRhs,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And(left, right) => write!(f, "{} AND {}", left, right),
            Condition::Or(left, right) => write!(f, "{} OR {}", left, right),
            Condition::Not(inner) => write!(f, "NOT ({})", inner),
            Condition::Compare { column, op, rhs } => write!(f, "{} {} {}", column, op, rhs),
        }
    }
}

/// Sort direction of one ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending (the default).
    Asc,
    /// Descending.
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One ORDER BY key; earlier keys take priority, ties fall through to the
/// next key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    /// The sort column.
    pub column: ColumnRef,
    /// The sort direction.
    pub direction: OrderDirection,
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Keep only matched primary rows.
    Inner,
    /// Keep unmatched primary rows, null-filling secondary columns.
    Left,
    /// Accepted by the parser, but the evaluator does not implement right
    /// joins: evaluation logs a warning and yields the unjoined primary
    /// rows.
    Right,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER"),
            JoinKind::Left => write!(f, "LEFT"),
            JoinKind::Right => write!(f, "RIGHT"),
        }
    }
}

/// A join against a secondary row set, on a single equality predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    /// Join flavor.
    pub kind: JoinKind,
    /// Name of the joined dataset.
    pub table: String,
    /// Column resolved against primary rows.
    pub left: ColumnRef,
    /// Column resolved against secondary rows.
    pub right: ColumnRef,
}

impl fmt::Display for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {} = {}",
            self.kind, self.table, self.left, self.right
        )
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The select list; `[Wildcard]` for `SELECT *`.
    pub columns: Vec<ColumnSpec>,
    /// FROM dataset name, when written.
    pub from: Option<String>,
    /// WHERE condition, when written.
    pub where_clause: Option<Condition>,
    /// ORDER BY keys; empty when absent.
    pub order_by: Vec<OrderSpec>,
    /// GROUP BY columns; empty when absent.
    pub group_by: Vec<ColumnRef>,
    /// JOIN clause, when written.
    pub join: Option<JoinSpec>,
    /// LIMIT row count, when written.
    pub limit: Option<usize>,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (index, spec) in self.columns.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", spec)?;
        }
        if let Some(from) = &self.from {
            write!(f, " FROM {}", from)?;
        }
        if let Some(condition) = &self.where_clause {
            write!(f, " WHERE {}", condition)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (index, key) in self.order_by.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", key)?;
            }
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY ")?;
            for (index, column) in self.group_by.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", column)?;
            }
        }
        if let Some(join) = &self.join {
            write!(f, " {}", join)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref_splits_at_first_dot() {
        let column = ColumnRef::parse("users.profile.name");
        assert_eq!(column.table.as_deref(), Some("users"));
        assert_eq!(column.column, "profile.name");
        assert_eq!(column.full_name(), "users.profile.name");

        let bare = ColumnRef::parse("age");
        assert_eq!(bare.table, None);
        assert_eq!(bare.full_name(), "age");
    }

    #[test]
    fn test_output_name_prefers_alias() {
        let spec = ColumnSpec::Column {
            column: ColumnRef::parse("users.name"),
            alias: Some("who".to_string()),
        };
        assert_eq!(spec.output_name(), "who");

        let bare = ColumnSpec::Column {
            column: ColumnRef::parse("users.name"),
            alias: None,
        };
        assert_eq!(bare.output_name(), "users.name");
    }

    #[test]
    fn test_aggregate_output_name() {
        let spec = ColumnSpec::Aggregate {
            function: AggregateFn::Count,
            argument: AggregateArg::Wildcard,
            alias: None,
        };
        assert_eq!(spec.output_name(), "COUNT(*)");

        let sum = ColumnSpec::Aggregate {
            function: AggregateFn::Sum,
            argument: AggregateArg::Column(ColumnRef::parse("v")),
            alias: Some("total".to_string()),
        };
        assert_eq!(sum.output_name(), "total");
    }

    #[test]
    fn test_compare_op_from_symbol() {
        assert_eq!(CompareOp::from_symbol("=="), CompareOp::Eq);
        assert_eq!(CompareOp::from_symbol("<>"), CompareOp::NotEq);
        assert_eq!(
            CompareOp::from_symbol("!"),
            CompareOp::Other("!".to_string())
        );
    }

    #[test]
    fn test_query_display() {
        let query = Query {
            columns: vec![ColumnSpec::Column {
                column: ColumnRef::parse("name"),
                alias: None,
            }],
            from: Some("users".to_string()),
            where_clause: Some(Condition::Compare {
                column: ColumnRef::parse("age"),
                op: CompareOp::Gt,
                rhs: CompareRhs::Scalar(Value::Number(30.0)),
            }),
            order_by: vec![OrderSpec {
                column: ColumnRef::parse("name"),
                direction: OrderDirection::Asc,
            }],
            group_by: Vec::new(),
            join: None,
            limit: Some(10),
        };
        assert_eq!(
            query.to_string(),
            "SELECT name FROM users WHERE age > 30 ORDER BY name ASC LIMIT 10"
        );
    }
}
