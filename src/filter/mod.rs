//! SCIM value-filter expressions.
//!
//! A value filter is the boolean predicate written between brackets in a
//! SCIM path, e.g. the `type eq "work"` in `emails[type eq "work"]`. It is
//! used to select specific entries of a multi-valued attribute.
//!
//! This module provides the expression tree ([`Filter`]), a parser for the
//! RFC 7644 filter grammar subset that is valid inside a value filter, and
//! an evaluator ([`Filter::matches`]) that tests a candidate JSON node.
//! Evaluation never fails: a malformed comparison (wrong operand kinds,
//! missing attribute) simply evaluates to false, so filters are safe to run
//! against arbitrary documents.

use crate::error::{ScimError, ScimResult};
use serde_json::Value;
use std::fmt;

/// Comparison operators usable in a value filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Contains (substring)
    Co,
    /// Starts with
    Sw,
    /// Ends with
    Ew,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
}

impl CompareOp {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Co => "co",
            Self::Sw => "sw",
            Self::Ew => "ew",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "co" => Some(Self::Co),
            "sw" => Some(Self::Sw),
            "ew" => Some(Self::Ew),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            _ => None,
        }
    }
}

/// A parsed value-filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `attr op literal` comparison
    Compare {
        /// Sub-attribute path relative to the candidate node (may be dotted)
        attribute: String,
        op: CompareOp,
        /// Literal operand as parsed JSON (string, number, boolean or null)
        literal: Value,
    },
    /// `attr pr` presence test
    Present { attribute: String },
    /// Logical conjunction
    And(Box<Filter>, Box<Filter>),
    /// Logical disjunction
    Or(Box<Filter>, Box<Filter>),
    /// Logical negation
    Not(Box<Filter>),
}

impl Filter {
    /// Parse a value-filter expression.
    ///
    /// Accepts the grammar valid inside a SCIM value filter: comparisons,
    /// `pr`, `and`/`or`/`not` (case-insensitive keywords) and parentheses.
    /// Literals are JSON: double-quoted strings, numbers, `true`, `false`,
    /// `null`.
    pub fn parse(input: &str) -> ScimResult<Self> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
        };
        let filter = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(ScimError::invalid_filter(
                input,
                format!("unexpected trailing token '{}'", parser.tokens[parser.pos]),
            ));
        }
        Ok(filter)
    }

    /// Evaluate this filter against a candidate JSON node.
    ///
    /// The node is typically one entry of a multi-valued attribute. String
    /// comparisons are case-insensitive unless `case_exact` is set. Missing
    /// attributes make comparisons evaluate false; `pr` tests for a
    /// non-null, non-empty field. Never fails.
    pub fn matches(&self, node: &Value, case_exact: bool) -> bool {
        match self {
            Self::And(left, right) => {
                left.matches(node, case_exact) && right.matches(node, case_exact)
            }
            Self::Or(left, right) => {
                left.matches(node, case_exact) || right.matches(node, case_exact)
            }
            Self::Not(inner) => !inner.matches(node, case_exact),
            Self::Present { attribute } => match resolve(node, attribute) {
                Some(Value::Null) | None => false,
                Some(Value::Array(items)) => !items.is_empty(),
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Self::Compare {
                attribute,
                op,
                literal,
            } => match resolve(node, attribute) {
                // A multi-valued target matches when any entry matches.
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| compare(item, *op, literal, case_exact)),
                Some(value) => compare(value, *op, literal, case_exact),
                None => false,
            },
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                attribute,
                op,
                literal,
            } => write!(f, "{} {} {}", attribute, op.as_str(), literal),
            Self::Present { attribute } => write!(f, "{} pr", attribute),
            Self::And(left, right) => write!(f, "{} and {}", left, right),
            Self::Or(left, right) => write!(f, "({} or {})", left, right),
            Self::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}

/// Resolve a dotted sub-attribute path within a candidate node.
///
/// Attribute name matching is case-insensitive per RFC 7643.
fn resolve<'a>(node: &'a Value, attribute: &str) -> Option<&'a Value> {
    let mut current = node;
    for segment in attribute.split('.') {
        let obj = current.as_object()?;
        current = obj
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(segment))
            .map(|(_, v)| v)?;
    }
    Some(current)
}

fn compare(value: &Value, op: CompareOp, literal: &Value, case_exact: bool) -> bool {
    match op {
        CompareOp::Eq => values_equal(value, literal, case_exact),
        CompareOp::Ne => !values_equal(value, literal, case_exact),
        CompareOp::Co => with_strings(value, literal, case_exact, |v, l| v.contains(l.as_str())),
        CompareOp::Sw => with_strings(value, literal, case_exact, |v, l| v.starts_with(l.as_str())),
        CompareOp::Ew => with_strings(value, literal, case_exact, |v, l| v.ends_with(l.as_str())),
        CompareOp::Gt => ordering(value, literal, case_exact).is_some_and(|o| o.is_gt()),
        CompareOp::Ge => ordering(value, literal, case_exact).is_some_and(|o| o.is_ge()),
        CompareOp::Lt => ordering(value, literal, case_exact).is_some_and(|o| o.is_lt()),
        CompareOp::Le => ordering(value, literal, case_exact).is_some_and(|o| o.is_le()),
    }
}

fn values_equal(value: &Value, literal: &Value, case_exact: bool) -> bool {
    match (value, literal) {
        (Value::String(v), Value::String(l)) => {
            if case_exact {
                v == l
            } else {
                v.eq_ignore_ascii_case(l)
            }
        }
        // Numeric equality regardless of integer/decimal representation
        (Value::Number(v), Value::Number(l)) => match (v.as_f64(), l.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => v == l,
        },
        (a, b) => a == b,
    }
}

fn with_strings<F>(value: &Value, literal: &Value, case_exact: bool, test: F) -> bool
where
    F: Fn(&str, &String) -> bool,
{
    match (value, literal) {
        (Value::String(v), Value::String(l)) => {
            if case_exact {
                test(v, l)
            } else {
                test(&v.to_lowercase(), &l.to_lowercase())
            }
        }
        _ => false,
    }
}

fn ordering(value: &Value, literal: &Value, case_exact: bool) -> Option<std::cmp::Ordering> {
    match (value, literal) {
        (Value::Number(v), Value::Number(l)) => v.as_f64()?.partial_cmp(&l.as_f64()?),
        (Value::String(v), Value::String(l)) => {
            if case_exact {
                Some(v.cmp(l))
            } else {
                Some(v.to_lowercase().cmp(&l.to_lowercase()))
            }
        }
        _ => None,
    }
}

fn tokenize(input: &str) -> ScimResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' | ')' => {
                chars.next();
                tokens.push(c.to_string());
            }
            '"' => {
                chars.next();
                let mut literal = String::from("\"");
                let mut closed = false;
                while let Some(c) = chars.next() {
                    literal.push(c);
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            literal.push(escaped);
                        }
                    } else if c == '"' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(ScimError::invalid_filter(input, "unterminated string literal"));
                }
                tokens.push(literal);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ' ' || c == '\t' || c == '(' || c == ')' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(word);
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<String>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&str> {
        let token = self.tokens.get(self.pos).map(String::as_str);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> ScimResult<Filter> {
        let mut left = self.parse_and()?;
        while self.peek().is_some_and(|t| t.eq_ignore_ascii_case("or")) {
            self.next();
            let right = self.parse_and()?;
            left = Filter::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ScimResult<Filter> {
        let mut left = self.parse_unary()?;
        while self.peek().is_some_and(|t| t.eq_ignore_ascii_case("and")) {
            self.next();
            let right = self.parse_unary()?;
            left = Filter::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ScimResult<Filter> {
        match self.peek() {
            Some(t) if t.eq_ignore_ascii_case("not") => {
                self.next();
                if self.peek() != Some("(") {
                    return Err(ScimError::invalid_filter(
                        self.input,
                        "'not' must be followed by a parenthesized expression",
                    ));
                }
                self.next();
                let inner = self.parse_or()?;
                self.expect_close_paren()?;
                Ok(Filter::Not(Box::new(inner)))
            }
            Some("(") => {
                self.next();
                let inner = self.parse_or()?;
                self.expect_close_paren()?;
                Ok(inner)
            }
            Some(_) => self.parse_comparison(),
            None => Err(ScimError::invalid_filter(self.input, "unexpected end of filter")),
        }
    }

    fn parse_comparison(&mut self) -> ScimResult<Filter> {
        let input = self.input;

        let attribute = self
            .next()
            .ok_or_else(|| ScimError::invalid_filter(input, "expected attribute name"))?
            .to_string();

        if attribute.starts_with('"') || attribute == ")" {
            return Err(ScimError::invalid_filter(
                input,
                format!("expected attribute name, found '{}'", attribute),
            ));
        }

        let op_token = self
            .next()
            .ok_or_else(|| ScimError::invalid_filter(input, "expected operator"))?
            .to_string();

        if op_token.eq_ignore_ascii_case("pr") {
            return Ok(Filter::Present { attribute });
        }

        let op = CompareOp::from_str(&op_token).ok_or_else(|| {
            ScimError::invalid_filter(input, format!("unknown operator '{}'", op_token))
        })?;

        let literal_token = self
            .next()
            .ok_or_else(|| ScimError::invalid_filter(input, "expected literal operand"))?;

        let literal: Value = serde_json::from_str(literal_token).map_err(|_| {
            ScimError::invalid_filter(input, format!("invalid literal '{}'", literal_token))
        })?;

        Ok(Filter::Compare {
            attribute,
            op,
            literal,
        })
    }

    fn expect_close_paren(&mut self) -> ScimResult<()> {
        if self.next() != Some(")") {
            return Err(ScimError::invalid_filter(self.input, "expected ')'"));
        }
        Ok(())
    }
}
