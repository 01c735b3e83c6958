//! Filter expression parsing
//!
//! Turns `column.operator.value` strings into [`Condition`]s. Identifiers are
//! emitted verbatim; only values are bound.

use super::error::FilterError;
use super::operators::{FilterOperator, NEGATION_TOKEN};
use super::types::{Condition, FilterWarning, ParsedFilters, SqlValue};

/// Literals accepted by `is` without a bound parameter
const IS_LITERALS: [&str; 3] = ["null", "true", "false"];

/// Parse a single filter expression (e.g. `name.eq.John`, `age.not.gt.25`).
///
/// The expression is split on its first two dots only, so the value may
/// contain dots (`email.eq.a@b.com`).
pub fn parse_filter(expression: &str) -> Result<Condition, FilterError> {
    let expression = expression.trim();

    let mut parts = expression.splitn(3, '.');
    let (column, token, rest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(token), Some(rest)) => (column, token, rest),
        _ => return Err(FilterError::malformed(expression)),
    };

    // `not` takes the next segment as its operator; without one, `not`
    // itself is the operator and is not in the table
    let (negated, token, value) = if token == NEGATION_TOKEN {
        let (token, value) = rest
            .split_once('.')
            .ok_or_else(|| FilterError::unsupported(expression, NEGATION_TOKEN))?;
        (true, token, value)
    } else {
        (false, token, rest)
    };

    let operator = FilterOperator::from_token(token)
        .ok_or_else(|| FilterError::unsupported(expression, token))?;
    let sql_op = operator.sql(negated);

    let condition = match operator {
        FilterOperator::In => {
            let params: Vec<SqlValue> = value.split(',').map(SqlValue::from).collect();
            let placeholders = vec!["?"; params.len()].join(", ");
            Condition::new(format!("{} {} ({})", column, sql_op, placeholders), params)
        }
        FilterOperator::Is if is_literal(value) => Condition::new(
            format!("{} {} {}", column, sql_op, value.to_ascii_uppercase()),
            Vec::new(),
        ),
        FilterOperator::Ilike => Condition::new(
            format!("lower({}) {} lower(?)", column, sql_op),
            vec![SqlValue::coerce(value)],
        ),
        _ => Condition::new(
            format!("{} {} ?", column, sql_op),
            vec![SqlValue::coerce(value)],
        ),
    };

    Ok(condition)
}

/// Parse a comma-separated list of filter expressions.
///
/// Best effort: an expression that fails to parse is skipped and reported
/// in [`ParsedFilters::warnings`]; the rest are joined with `AND`.
pub fn parse_raw_filters(raw_filters: &str) -> ParsedFilters {
    let mut parsed = ParsedFilters::default();
    if raw_filters.is_empty() {
        return parsed;
    }

    let mut clauses = Vec::new();
    for expression in raw_filters.split(',') {
        match parse_filter(expression) {
            Ok(condition) => {
                clauses.push(condition.sql);
                parsed.params.extend(condition.params);
            }
            Err(error) => {
                tracing::warn!(expression = %expression, kind = error.kind(), error = %error, "Skipping invalid filter");
                parsed.warnings.push(FilterWarning {
                    expression: expression.to_string(),
                    error,
                });
            }
        }
    }

    parsed.clause = clauses.join(" AND ");
    parsed
}

fn is_literal(value: &str) -> bool {
    IS_LITERALS.iter().any(|l| value.eq_ignore_ascii_case(l))
}
