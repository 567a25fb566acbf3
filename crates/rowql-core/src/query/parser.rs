//! Recursive-descent parser for the query language.
//!
//! The parser keeps one token of lookahead (`current_token`) and walks the
//! token buffer with `advance`/`expect_token`. Errors are raised only where
//! a mandatory token is required; each optional clause parser first checks
//! whether the next token starts its clause and backs off without consuming
//! anything when it does not.
//!
//! Two modes exist. The default mode calls the optional clause parsers in
//! the fixed order FROM, WHERE, ORDER BY, GROUP BY, JOIN, LIMIT and never
//! checks that the input was fully consumed: clauses written out of that
//! order, and any trailing tokens, are silently ignored. Strict mode
//! ([`Parser::strict`]) instead dispatches clauses in any textual order,
//! rejects duplicated clauses, and requires end of input (one trailing
//! semicolon is permitted).

use std::fmt;

use crate::query::ast::{
    AggregateArg, AggregateFn, ColumnRef, ColumnSpec, CompareOp, CompareRhs, Condition, JoinKind,
    JoinSpec, OrderDirection, OrderSpec, Query,
};
use crate::query::lexer::{Lexer, Token};
use crate::value::Value;

/// Errors produced while parsing a query.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A mandatory token was missing or of the wrong kind.
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token actually found.
        found: Token,
    },
    /// Strict mode only: input continued past the last clause.
    TrailingInput {
        /// The first unconsumed token.
        found: Token,
    },
    /// Strict mode only: the same clause appeared twice.
    DuplicateClause {
        /// Clause keyword, e.g. `WHERE`.
        clause: &'static str,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParseError::TrailingInput { found } => {
                write!(f, "unexpected input after query: {}", found)
            }
            ParseError::DuplicateClause { clause } => {
                write!(f, "duplicate {} clause", clause)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parser state: the token buffer plus a cursor with one token of
/// lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    strict: bool,
}

impl Parser {
    /// Create a parser in the default, permissive mode.
    pub fn new(input: &str) -> Self {
        Self {
            tokens: Lexer::new(input).tokenize(),
            position: 0,
            strict: false,
        }
    }

    /// Create a parser in strict mode: clauses in any order, no
    /// duplicates, and nothing after the query.
    pub fn strict(input: &str) -> Self {
        Self {
            tokens: Lexer::new(input).tokenize(),
            position: 0,
            strict: true,
        }
    }

    /// Parse one query.
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        self.expect_token(Token::Select)?;
        let columns = self.parse_select_list()?;
        let mut query = Query {
            columns,
            from: None,
            where_clause: None,
            order_by: Vec::new(),
            group_by: Vec::new(),
            join: None,
            limit: None,
        };

        if self.strict {
            self.parse_clauses_any_order(&mut query)?;
        } else {
            query.from = self.parse_from()?;
            query.where_clause = self.parse_where()?;
            query.order_by = self.parse_order_by()?.unwrap_or_default();
            query.group_by = self.parse_group_by()?.unwrap_or_default();
            query.join = self.parse_join()?;
            query.limit = self.parse_limit()?;
        }

        Ok(query)
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    /// Move to the next token, saturating at the trailing `Eof`.
    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn expect_token(&mut self, expected: Token) -> Result<(), ParseError> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_token().clone(),
            })
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.current_token() {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: other.clone(),
            }),
        }
    }

    fn parse_select_list(&mut self) -> Result<Vec<ColumnSpec>, ParseError> {
        if let Token::Identifier(name) = self.current_token() {
            if name == "*" {
                self.advance();
                return Ok(vec![ColumnSpec::Wildcard]);
            }
        }

        let mut columns = vec![self.parse_column_spec()?];
        while *self.current_token() == Token::Comma {
            self.advance();
            columns.push(self.parse_column_spec()?);
        }
        Ok(columns)
    }

    fn parse_column_spec(&mut self) -> Result<ColumnSpec, ParseError> {
        if let Some(function) = aggregate_fn(self.current_token()) {
            self.advance();
            self.expect_token(Token::LeftParen)?;
            let argument = match self.current_token() {
                Token::Identifier(name) if name == "*" => {
                    self.advance();
                    AggregateArg::Wildcard
                }
                Token::Identifier(name) => {
                    let raw = name.clone();
                    self.advance();
                    AggregateArg::Column(ColumnRef::parse(&raw))
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "aggregate argument".to_string(),
                        found: other.clone(),
                    })
                }
            };
            self.expect_token(Token::RightParen)?;
            let alias = self.parse_alias()?;
            return Ok(ColumnSpec::Aggregate {
                function,
                argument,
                alias,
            });
        }

        let raw = self.expect_identifier("column name")?;
        let alias = self.parse_alias()?;
        Ok(ColumnSpec::Column {
            column: ColumnRef::parse(&raw),
            alias,
        })
    }

    fn parse_alias(&mut self) -> Result<Option<String>, ParseError> {
        if *self.current_token() != Token::As {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.expect_identifier("alias")?))
    }

    fn parse_from(&mut self) -> Result<Option<String>, ParseError> {
        if *self.current_token() != Token::From {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.expect_identifier("table name")?))
    }

    fn parse_where(&mut self) -> Result<Option<Condition>, ParseError> {
        if *self.current_token() != Token::Where {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.parse_condition()?))
    }

    /// `Condition := Term ((AND|OR) Term)*`, folded left to right with no
    /// precedence between AND and OR.
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let mut condition = self.parse_term()?;
        loop {
            match self.current_token() {
                Token::And => {
                    self.advance();
                    let right = self.parse_term()?;
                    condition = Condition::And(Box::new(condition), Box::new(right));
                }
                Token::Or => {
                    self.advance();
                    let right = self.parse_term()?;
                    condition = Condition::Or(Box::new(condition), Box::new(right));
                }
                _ => break,
            }
        }
        Ok(condition)
    }

    fn parse_term(&mut self) -> Result<Condition, ParseError> {
        match self.current_token() {
            Token::Not => {
                self.advance();
                Ok(Condition::Not(Box::new(self.parse_term()?)))
            }
            Token::LeftParen => {
                self.advance();
                let inner = self.parse_condition()?;
                self.expect_token(Token::RightParen)?;
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Condition, ParseError> {
        let raw = self.expect_identifier("column name")?;
        let column = ColumnRef::parse(&raw);

        let op = match self.current_token() {
            Token::Operator(symbol) => {
                let op = CompareOp::from_symbol(symbol);
                self.advance();
                op
            }
            Token::Like => {
                self.advance();
                CompareOp::Like
            }
            Token::In => {
                self.advance();
                CompareOp::In
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    expected: "comparison operator".to_string(),
                    found: other.clone(),
                })
            }
        };

        if op == CompareOp::In {
            self.expect_token(Token::LeftParen)?;
            let mut values = vec![self.parse_value()?];
            while *self.current_token() == Token::Comma {
                self.advance();
                values.push(self.parse_value()?);
            }
            self.expect_token(Token::RightParen)?;
            return Ok(Condition::Compare {
                column,
                op,
                rhs: CompareRhs::List(values),
            });
        }

        let value = self.parse_value()?;
        Ok(Condition::Compare {
            column,
            op,
            rhs: CompareRhs::Scalar(value),
        })
    }

    /// A comparison literal: quoted string, number, or a bare word taken
    /// as text.
    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.current_token() {
            Token::String(text) => {
                let value = Value::Text(text.clone());
                self.advance();
                Ok(value)
            }
            Token::Number(number) => {
                let value = Value::Number(*number);
                self.advance();
                Ok(value)
            }
            Token::Identifier(word) => {
                let value = Value::Text(word.clone());
                self.advance();
                Ok(value)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "literal value".to_string(),
                found: other.clone(),
            }),
        }
    }

    fn parse_order_by(&mut self) -> Result<Option<Vec<OrderSpec>>, ParseError> {
        if *self.current_token() != Token::Order {
            return Ok(None);
        }
        self.advance();
        self.expect_token(Token::By)?;

        let mut keys = vec![self.parse_order_spec()?];
        while *self.current_token() == Token::Comma {
            self.advance();
            keys.push(self.parse_order_spec()?);
        }
        Ok(Some(keys))
    }

    fn parse_order_spec(&mut self) -> Result<OrderSpec, ParseError> {
        let raw = self.expect_identifier("column name")?;
        let direction = match self.current_token() {
            Token::Asc => {
                self.advance();
                OrderDirection::Asc
            }
            Token::Desc => {
                self.advance();
                OrderDirection::Desc
            }
            _ => OrderDirection::Asc,
        };
        Ok(OrderSpec {
            column: ColumnRef::parse(&raw),
            direction,
        })
    }

    fn parse_group_by(&mut self) -> Result<Option<Vec<ColumnRef>>, ParseError> {
        if *self.current_token() != Token::Group {
            return Ok(None);
        }
        self.advance();
        self.expect_token(Token::By)?;

        let mut columns = vec![ColumnRef::parse(&self.expect_identifier("column name")?)];
        while *self.current_token() == Token::Comma {
            self.advance();
            columns.push(ColumnRef::parse(&self.expect_identifier("column name")?));
        }
        Ok(Some(columns))
    }

    fn parse_join(&mut self) -> Result<Option<JoinSpec>, ParseError> {
        let kind = match self.current_token() {
            Token::Inner => {
                self.advance();
                JoinKind::Inner
            }
            Token::Left => {
                self.advance();
                JoinKind::Left
            }
            Token::Right => {
                self.advance();
                JoinKind::Right
            }
            Token::Join => JoinKind::Inner,
            _ => return Ok(None),
        };
        self.expect_token(Token::Join)?;
        let table = self.expect_identifier("join table name")?;
        self.expect_token(Token::On)?;
        let left = ColumnRef::parse(&self.expect_identifier("join column")?);
        self.expect_token(Token::Operator("=".to_string()))?;
        let right = ColumnRef::parse(&self.expect_identifier("join column")?);
        Ok(Some(JoinSpec {
            kind,
            table,
            left,
            right,
        }))
    }

    fn parse_limit(&mut self) -> Result<Option<usize>, ParseError> {
        if *self.current_token() != Token::Limit {
            return Ok(None);
        }
        self.advance();
        match self.current_token() {
            Token::Number(number) => {
                let limit = *number as usize;
                self.advance();
                Ok(Some(limit))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "row count".to_string(),
                found: other.clone(),
            }),
        }
    }

    /// Strict-mode clause loop: dispatch on the lookahead until end of
    /// input, rejecting clauses that appear twice and anything that is not
    /// a clause.
    fn parse_clauses_any_order(&mut self, query: &mut Query) -> Result<(), ParseError> {
        loop {
            match self.current_token() {
                Token::From => {
                    if query.from.is_some() {
                        return Err(ParseError::DuplicateClause { clause: "FROM" });
                    }
                    query.from = self.parse_from()?;
                }
                Token::Where => {
                    if query.where_clause.is_some() {
                        return Err(ParseError::DuplicateClause { clause: "WHERE" });
                    }
                    query.where_clause = self.parse_where()?;
                }
                Token::Order => {
                    if !query.order_by.is_empty() {
                        return Err(ParseError::DuplicateClause { clause: "ORDER BY" });
                    }
                    query.order_by = self.parse_order_by()?.unwrap_or_default();
                }
                Token::Group => {
                    if !query.group_by.is_empty() {
                        return Err(ParseError::DuplicateClause { clause: "GROUP BY" });
                    }
                    query.group_by = self.parse_group_by()?.unwrap_or_default();
                }
                Token::Inner | Token::Left | Token::Right | Token::Join => {
                    if query.join.is_some() {
                        return Err(ParseError::DuplicateClause { clause: "JOIN" });
                    }
                    query.join = self.parse_join()?;
                }
                Token::Limit => {
                    if query.limit.is_some() {
                        return Err(ParseError::DuplicateClause { clause: "LIMIT" });
                    }
                    query.limit = self.parse_limit()?;
                }
                Token::Semicolon => {
                    self.advance();
                    return match self.current_token() {
                        Token::Eof => Ok(()),
                        other => Err(ParseError::TrailingInput {
                            found: other.clone(),
                        }),
                    };
                }
                Token::Eof => return Ok(()),
                other => {
                    return Err(ParseError::TrailingInput {
                        found: other.clone(),
                    })
                }
            }
        }
    }
}

fn aggregate_fn(token: &Token) -> Option<AggregateFn> {
    match token {
        Token::Count => Some(AggregateFn::Count),
        Token::Sum => Some(AggregateFn::Sum),
        Token::Avg => Some(AggregateFn::Avg),
        Token::Min => Some(AggregateFn::Min),
        Token::Max => Some(AggregateFn::Max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Query {
        Parser::new(input).parse().unwrap()
    }

    #[test]
    fn test_select_wildcard() {
        let query = parse("SELECT * FROM users");
        assert_eq!(query.columns, vec![ColumnSpec::Wildcard]);
        assert_eq!(query.from.as_deref(), Some("users"));
    }

    #[test]
    fn test_select_columns_with_aliases() {
        let query = parse("SELECT name, users.age AS years FROM users");
        assert_eq!(query.columns.len(), 2);
        assert_eq!(query.columns[0].output_name(), "name");
        assert_eq!(query.columns[1].output_name(), "years");
    }

    #[test]
    fn test_select_without_from() {
        let query = parse("SELECT name");
        assert_eq!(query.from, None);
        assert_eq!(query.columns.len(), 1);
    }

    #[test]
    fn test_aggregate_calls() {
        let query = parse("SELECT COUNT(*), SUM(amount) AS total FROM sales");
        assert_eq!(
            query.columns[0],
            ColumnSpec::Aggregate {
                function: AggregateFn::Count,
                argument: AggregateArg::Wildcard,
                alias: None,
            }
        );
        assert_eq!(query.columns[1].output_name(), "total");
    }

    #[test]
    fn test_where_condition_folds_left() {
        let query = parse("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3");
        // No precedence: (a = 1 OR b = 2) AND c = 3.
        match query.where_clause.unwrap() {
            Condition::And(left, _) => match *left {
                Condition::Or(_, _) => {}
                other => panic!("expected OR on the left, got {}", other),
            },
            other => panic!("expected top-level AND, got {}", other),
        }
    }

    #[test]
    fn test_where_not_and_parentheses() {
        let query = parse("SELECT * FROM t WHERE NOT (a = 1 OR b = 2)");
        match query.where_clause.unwrap() {
            Condition::Not(inner) => match *inner {
                Condition::Or(_, _) => {}
                other => panic!("expected OR inside NOT, got {}", other),
            },
            other => panic!("expected NOT, got {}", other),
        }
    }

    #[test]
    fn test_in_list() {
        let query = parse("SELECT * FROM t WHERE env IN ('prod', 'dev', 3)");
        match query.where_clause.unwrap() {
            Condition::Compare { op, rhs, .. } => {
                assert_eq!(op, CompareOp::In);
                assert_eq!(
                    rhs,
                    CompareRhs::List(vec![
                        Value::text("prod"),
                        Value::text("dev"),
                        Value::Number(3.0),
                    ])
                );
            }
            other => panic!("expected comparison, got {}", other),
        }
    }

    #[test]
    fn test_bare_word_as_comparison_value() {
        let query = parse("SELECT * FROM t WHERE env = prod");
        match query.where_clause.unwrap() {
            Condition::Compare { rhs, .. } => {
                assert_eq!(rhs, CompareRhs::Scalar(Value::text("prod")));
            }
            other => panic!("expected comparison, got {}", other),
        }
    }

    #[test]
    fn test_order_by_multiple_keys() {
        let query = parse("SELECT * FROM t ORDER BY a DESC, b");
        assert_eq!(query.order_by.len(), 2);
        assert_eq!(query.order_by[0].direction, OrderDirection::Desc);
        assert_eq!(query.order_by[1].direction, OrderDirection::Asc);
    }

    #[test]
    fn test_group_by() {
        let query = parse("SELECT env, COUNT(*) FROM t GROUP BY env");
        assert_eq!(query.group_by, vec![ColumnRef::parse("env")]);
    }

    #[test]
    fn test_join_defaults_to_inner() {
        let query = parse("SELECT * FROM a JOIN b ON a.id = b.id");
        let join = query.join.unwrap();
        assert_eq!(join.kind, JoinKind::Inner);
        assert_eq!(join.table, "b");
        assert_eq!(join.left, ColumnRef::parse("a.id"));
        assert_eq!(join.right, ColumnRef::parse("b.id"));
    }

    #[test]
    fn test_left_and_right_join_kinds() {
        let left = parse("SELECT * FROM a LEFT JOIN b ON id = id");
        assert_eq!(left.join.unwrap().kind, JoinKind::Left);

        let right = parse("SELECT * FROM a RIGHT JOIN b ON id = id");
        assert_eq!(right.join.unwrap().kind, JoinKind::Right);
    }

    #[test]
    fn test_limit() {
        let query = parse("SELECT * FROM t LIMIT 2");
        assert_eq!(query.limit, Some(2));
    }

    #[test]
    fn test_fractional_limit_truncates() {
        let query = parse("SELECT * FROM t LIMIT 2.9");
        assert_eq!(query.limit, Some(2));
    }

    #[test]
    fn test_clauses_out_of_order_are_ignored() {
        // GROUP BY is parsed after ORDER BY, so an ORDER BY written later
        // in the text is left unconsumed and dropped.
        let query = parse("SELECT env, COUNT(*) AS c FROM t GROUP BY env ORDER BY c");
        assert_eq!(query.group_by.len(), 1);
        assert!(query.order_by.is_empty());
    }

    #[test]
    fn test_trailing_tokens_are_ignored() {
        let query = parse("SELECT * FROM t LIMIT 1 nonsense ; 42");
        assert_eq!(query.limit, Some(1));
    }

    #[test]
    fn test_join_without_on_is_an_error() {
        let err = Parser::new("SELECT * FROM a JOIN b").parse().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_aggregate_without_parens_is_an_error() {
        let err = Parser::new("SELECT COUNT FROM t").parse().unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, "("),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_comparison_value_is_an_error() {
        let err = Parser::new("SELECT * FROM t WHERE a =").parse().unwrap_err();
        match err {
            ParseError::UnexpectedToken { expected, found } => {
                assert_eq!(expected, "literal value");
                assert_eq!(found, Token::Eof);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_accepts_any_clause_order() {
        let query = Parser::strict("SELECT env, COUNT(*) AS c FROM t GROUP BY env ORDER BY env")
            .parse()
            .unwrap();
        assert_eq!(query.group_by.len(), 1);
        assert_eq!(query.order_by.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_trailing_input() {
        let err = Parser::strict("SELECT * FROM t LIMIT 1 nonsense")
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { .. }));
    }

    #[test]
    fn test_strict_mode_rejects_duplicate_clause() {
        let err = Parser::strict("SELECT * FROM t WHERE a = 1 WHERE b = 2")
            .parse()
            .unwrap_err();
        assert_eq!(err, ParseError::DuplicateClause { clause: "WHERE" });
    }

    #[test]
    fn test_strict_mode_allows_one_trailing_semicolon() {
        let query = Parser::strict("SELECT * FROM t;").parse().unwrap();
        assert_eq!(query.from.as_deref(), Some("t"));
    }

    #[test]
    fn test_permissive_mode_round_trips_canonical_text() {
        let text = "SELECT name, SUM(v) AS total FROM t WHERE age >= 21 ORDER BY name ASC GROUP BY name LEFT JOIN u ON t.id = u.id LIMIT 3";
        let query = parse(text);
        assert_eq!(parse(&query.to_string()), query);
    }
}
