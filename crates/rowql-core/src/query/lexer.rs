//! Lexer for the query language.
//!
//! Converts raw query text into a flat token stream ending in a single
//! [`Token::Eof`]. Tokenization is total: it classifies characters but
//! performs no validation, so malformed input degrades into partial or odd
//! tokens instead of an error. Unterminated string literals keep whatever
//! was read, and characters outside every other class are swallowed into
//! identifier tokens.

use std::fmt;

use crate::value::parse_float_prefix;

/// Tokens produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Token {
    // Keywords (matched case-insensitively, normalized to upper case)
    Select,
    From,
    Where,
    Order,
    By,
    Group,
    Join,
    On,
    Inner,
    Left,
    Right,
    And,
    Or,
    Not,
    In,
    Like,
    As,
    Asc,
    Desc,
    Limit,

    // Aggregate function keywords
    Count,
    Sum,
    Avg,
    Min,
    Max,

    /// Identifier, possibly dotted (`table.column` is one token).
    Identifier(String),
    /// Quoted string literal with escapes resolved.
    String(String),
    /// Numeric literal.
    Number(f64),
    /// Comparison operator symbol, e.g. `=`, `<>`, `<=`.
    Operator(String),

    // Punctuation
    LeftParen,
    RightParen,
    Comma,
    Semicolon,

    /// End of input; always the final token.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::From => write!(f, "FROM"),
            Token::Where => write!(f, "WHERE"),
            Token::Order => write!(f, "ORDER"),
            Token::By => write!(f, "BY"),
            Token::Group => write!(f, "GROUP"),
            Token::Join => write!(f, "JOIN"),
            Token::On => write!(f, "ON"),
            Token::Inner => write!(f, "INNER"),
            Token::Left => write!(f, "LEFT"),
            Token::Right => write!(f, "RIGHT"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::In => write!(f, "IN"),
            Token::Like => write!(f, "LIKE"),
            Token::As => write!(f, "AS"),
            Token::Asc => write!(f, "ASC"),
            Token::Desc => write!(f, "DESC"),
            Token::Limit => write!(f, "LIMIT"),
            Token::Count => write!(f, "COUNT"),
            Token::Sum => write!(f, "SUM"),
            Token::Avg => write!(f, "AVG"),
            Token::Min => write!(f, "MIN"),
            Token::Max => write!(f, "MAX"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::String(text) => write!(f, "'{}'", text),
            Token::Number(number) => write!(f, "{}", number),
            Token::Operator(symbol) => write!(f, "{}", symbol),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Lexer state.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer over the given input.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input. The result always ends with one
    /// [`Token::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.position >= self.input.len() {
            return Token::Eof;
        }

        let ch = self.current_char();
        match ch {
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            '"' | '\'' => self.read_string(ch),
            '=' | '<' | '>' | '!' => self.read_operator(ch),
            _ if ch.is_ascii_digit() => self.read_number(),
            _ => self.read_word(),
        }
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Read a string literal opened by `quote`. A backslash escapes the
    /// following character; a missing closing quote ends the literal at
    /// end of input.
    fn read_string(&mut self, quote: char) -> Token {
        self.advance();
        let mut text = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            self.advance();
            if ch == '\\' {
                if self.position < self.input.len() {
                    text.push(self.current_char());
                    self.advance();
                }
                continue;
            }
            if ch == quote {
                return Token::String(text);
            }
            text.push(ch);
        }

        Token::String(text)
    }

    /// Read an operator starting with `first`, greedily folding in the
    /// second character of `<>`, `!=`, `==`, `>=`, `<=`.
    fn read_operator(&mut self, first: char) -> Token {
        self.advance();
        if self.position < self.input.len() {
            let second = self.current_char();
            let two_char = matches!(
                (first, second),
                ('<', '>') | ('<', '=') | ('>', '=') | ('=', '=') | ('!', '=')
            );
            if two_char {
                self.advance();
                return Token::Operator(format!("{}{}", first, second));
            }
        }
        Token::Operator(first.to_string())
    }

    /// Read a numeric literal: digits and dots only. The token value is
    /// the longest parseable prefix, so `1.2.3` lexes as 1.2.
    fn read_number(&mut self) -> Token {
        let start = self.position;
        while self.position < self.input.len() {
            let ch = self.current_char();
            if ch.is_ascii_digit() || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        Token::Number(parse_float_prefix(&text).unwrap_or(0.0))
    }

    /// Read a word: the first character unconditionally, then any run of
    /// word/dot characters. Keywords are recognized on the upper-cased
    /// form; everything else, including `*` and stray symbols, becomes an
    /// identifier.
    fn read_word(&mut self) -> Token {
        let start = self.position;
        self.advance();
        while self.position < self.input.len() && is_word_char(self.current_char()) {
            self.advance();
        }

        let text: String = self.input[start..self.position].iter().collect();
        match text.to_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "ORDER" => Token::Order,
            "BY" => Token::By,
            "GROUP" => Token::Group,
            "JOIN" => Token::Join,
            "ON" => Token::On,
            "INNER" => Token::Inner,
            "LEFT" => Token::Left,
            "RIGHT" => Token::Right,
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "IN" => Token::In,
            "LIKE" => Token::Like,
            "AS" => Token::As,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "LIMIT" => Token::Limit,
            "COUNT" => Token::Count,
            "SUM" => Token::Sum,
            "AVG" => Token::Avg,
            "MIN" => Token::Min,
            "MAX" => Token::Max,
            _ => Token::Identifier(text),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}
