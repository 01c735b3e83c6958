//! Operator table

use std::fmt;

/// Token that negates the operator following it (`col.not.eq.5`)
pub const NEGATION_TOKEN: &str = "not";

/// Supported filter operators (PostgREST names)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    Like,
    Ilike,
    In,
}

impl FilterOperator {
    /// Resolve a base operator token. `not` is a modifier, never a base operator.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "is" => Some(Self::Is),
            "like" => Some(Self::Like),
            "ilike" => Some(Self::Ilike),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Is => "is",
            Self::Like => "like",
            Self::Ilike => "ilike",
            Self::In => "in",
        }
    }

    /// SQL operator text, with negation folded in.
    ///
    /// Comparisons negate to their complement. `ilike` shares `LIKE` with
    /// `like`; the parser lowers both sides to make it case-insensitive.
    pub fn sql(&self, negated: bool) -> &'static str {
        match (self, negated) {
            (Self::Eq, false) | (Self::Neq, true) => "=",
            (Self::Neq, false) | (Self::Eq, true) => "!=",
            (Self::Gt, false) | (Self::Lte, true) => ">",
            (Self::Gte, false) | (Self::Lt, true) => ">=",
            (Self::Lt, false) | (Self::Gte, true) => "<",
            (Self::Lte, false) | (Self::Gt, true) => "<=",
            (Self::Is, false) => "IS",
            (Self::Is, true) => "IS NOT",
            (Self::Like | Self::Ilike, false) => "LIKE",
            (Self::Like | Self::Ilike, true) => "NOT LIKE",
            (Self::In, false) => "IN",
            (Self::In, true) => "NOT IN",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FilterOperator; 10] = [
        FilterOperator::Eq,
        FilterOperator::Neq,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Is,
        FilterOperator::Like,
        FilterOperator::Ilike,
        FilterOperator::In,
    ];

    #[test]
    fn test_tokens_resolve_to_themselves() {
        for op in ALL {
            assert_eq!(FilterOperator::from_token(op.as_str()), Some(op));
        }
    }

    #[test]
    fn test_not_is_not_a_base_operator() {
        assert_eq!(FilterOperator::from_token(NEGATION_TOKEN), None);
        assert_eq!(FilterOperator::from_token("not.eq"), None);
        assert_eq!(FilterOperator::from_token("EQ"), None);
    }

    #[test]
    fn test_sql_table() {
        assert_eq!(FilterOperator::Eq.sql(false), "=");
        assert_eq!(FilterOperator::Neq.sql(false), "!=");
        assert_eq!(FilterOperator::Gt.sql(false), ">");
        assert_eq!(FilterOperator::Gte.sql(false), ">=");
        assert_eq!(FilterOperator::Lt.sql(false), "<");
        assert_eq!(FilterOperator::Lte.sql(false), "<=");
        assert_eq!(FilterOperator::Is.sql(false), "IS");
        assert_eq!(FilterOperator::Like.sql(false), "LIKE");
        assert_eq!(FilterOperator::In.sql(false), "IN");
    }

    #[test]
    fn test_negation_is_complement() {
        assert_eq!(FilterOperator::Eq.sql(true), FilterOperator::Neq.sql(false));
        assert_eq!(FilterOperator::Gt.sql(true), FilterOperator::Lte.sql(false));
        assert_eq!(FilterOperator::Lt.sql(true), FilterOperator::Gte.sql(false));
        assert_eq!(FilterOperator::Is.sql(true), "IS NOT");
        assert_eq!(FilterOperator::Ilike.sql(true), "NOT LIKE");
        assert_eq!(FilterOperator::In.sql(true), "NOT IN");
    }
}
