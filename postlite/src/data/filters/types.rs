//! Filter value and condition types

use std::fmt;

use serde_json::Value;

use super::error::FilterError;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Coerce a raw filter value.
    ///
    /// Precedence: `null`, `true`/`false` (any case), ASCII digits as an
    /// integer, anything `f64` accepts, otherwise the text unchanged.
    /// Digit strings too large for `i64` fall through to the float rule.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("null") {
            return Self::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = raw.parse::<i64>()
        {
            return Self::Integer(n);
        }
        match raw.parse::<f64>() {
            Ok(f) => Self::Real(f),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl From<&Value> for SqlValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Text(s.clone()),
            // Nested JSON is stored as its text form
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

/// One translated predicate: SQL with `?` placeholders plus its bind values
/// in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Condition {
    pub(crate) fn new(sql: String, params: Vec<SqlValue>) -> Self {
        Self { sql, params }
    }
}

/// A clause skipped while parsing a comma-joined filter string
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWarning {
    pub expression: String,
    pub error: FilterError,
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped filter '{}': {}", self.expression, self.error)
    }
}

/// Result of parsing a comma-joined filter string.
///
/// `clause` is the AND-conjunction of every expression that parsed (empty
/// when none did); `warnings` holds the ones that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFilters {
    pub clause: String,
    pub params: Vec<SqlValue>,
    pub warnings: Vec<FilterWarning>,
}

impl ParsedFilters {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_null_and_bools_any_case() {
        assert_eq!(SqlValue::coerce("null"), SqlValue::Null);
        assert_eq!(SqlValue::coerce("NULL"), SqlValue::Null);
        assert_eq!(SqlValue::coerce("True"), SqlValue::Bool(true));
        assert_eq!(SqlValue::coerce("FALSE"), SqlValue::Bool(false));
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(SqlValue::coerce("42"), SqlValue::Integer(42));
        assert_eq!(SqlValue::coerce("007"), SqlValue::Integer(7));
        assert_eq!(SqlValue::coerce("3.5"), SqlValue::Real(3.5));
        assert_eq!(SqlValue::coerce("-3"), SqlValue::Real(-3.0));
        assert_eq!(SqlValue::coerce("1e3"), SqlValue::Real(1000.0));
    }

    #[test]
    fn test_coerce_integer_overflow_becomes_real() {
        assert_eq!(
            SqlValue::coerce("99999999999999999999"),
            SqlValue::Real(1e20)
        );
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(SqlValue::coerce("active"), SqlValue::from("active"));
        assert_eq!(SqlValue::coerce(""), SqlValue::from(""));
        assert_eq!(
            SqlValue::coerce("2025-01-01"),
            SqlValue::from("2025-01-01")
        );
        assert_eq!(SqlValue::coerce("%example.com"), SqlValue::from("%example.com"));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(SqlValue::from(&serde_json::json!(null)), SqlValue::Null);
        assert_eq!(SqlValue::from(&serde_json::json!(7)), SqlValue::Integer(7));
        assert_eq!(SqlValue::from(&serde_json::json!(1.5)), SqlValue::Real(1.5));
        assert_eq!(SqlValue::from(&serde_json::json!("a")), SqlValue::from("a"));
        assert_eq!(
            SqlValue::from(&serde_json::json!({"k": 1})),
            SqlValue::from(r#"{"k":1}"#)
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = FilterWarning {
            expression: "bogus".to_string(),
            error: FilterError::malformed("bogus"),
        };
        assert!(warning.to_string().starts_with("skipped filter 'bogus'"));
    }
}
