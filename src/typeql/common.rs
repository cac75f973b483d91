//! Common building blocks for TypeQL statements: variables and literals.
//!
//! Caller-supplied values only ever enter statement text through
//! [`Literal`], which quotes and escapes strings. Type and attribute labels
//! come from the compiled-in schema and are written as-is.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use super::errors::TypeQlError;

lazy_static::lazy_static! {
    static ref VARIABLE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// Statement variable, rendered as `$name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var(String);

impl Var {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeQlError> {
        let name = name.into();
        if VARIABLE_NAME.is_match(&name) {
            Ok(Var(name))
        } else {
            Err(TypeQlError::InvalidVariable(name))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Derive a variable such as `$friend-id` from this one.
    pub fn suffixed(&self, suffix: &str) -> Result<Self, TypeQlError> {
        Var::new(format!("{}-{}", self.0, suffix))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Value literal. Strings are quoted; everything else renders unquoted.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Boolean(bool),
    Long(i64),
    DateTime(NaiveDateTime),
}

impl Literal {
    /// Parse an ISO 8601 datetime, with or without offset (offsets are
    /// normalised to UTC since the store keeps naive datetimes).
    pub fn parse_datetime(text: &str) -> Result<Self, TypeQlError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Literal::DateTime(dt.naive_utc()));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(Literal::DateTime)
            .map_err(|_| TypeQlError::InvalidDateTime(text.to_string()))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Long(n) => write!(f, "{}", n),
            Literal::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

/// Escape a string for use between double quotes.
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_is_escaped() {
        let lit = Literal::from(r#"p1"; delete $x; match $y has id "q"#);
        assert_eq!(
            lit.to_string(),
            r#""p1\"; delete $x; match $y has id \"q""#
        );
        assert_eq!(Literal::from("a\\b\nc").to_string(), r#""a\\b\nc""#);
    }

    #[test]
    fn test_control_characters_are_escaped_not_dropped() {
        assert_eq!(
            Literal::from("a\u{0}b\u{7}c").to_string(),
            r#""a\u0000b\u0007c""#
        );
    }

    #[test]
    fn test_non_string_literals_are_unquoted() {
        assert_eq!(Literal::Boolean(true).to_string(), "true");
        assert_eq!(Literal::Long(-42).to_string(), "-42");
        assert_eq!(
            Literal::parse_datetime("2024-05-01T12:30:00").unwrap().to_string(),
            "2024-05-01T12:30:00"
        );
        assert_eq!(
            Literal::parse_datetime("2024-05-01T12:30:00+02:00")
                .unwrap()
                .to_string(),
            "2024-05-01T10:30:00"
        );
        assert!(Literal::parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_variable_names_are_validated() {
        assert_eq!(Var::new("friend-id").unwrap().to_string(), "$friend-id");
        assert!(Var::new("page; delete").is_err());
        assert!(Var::new("-x").is_err());
        assert!(Var::new("").is_err());
        assert_eq!(
            Var::new("page").unwrap().suffixed("place").unwrap().name(),
            "page-place"
        );
    }
}
