//! Filter parse errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The expression does not split into column, operator and value
    #[error("Invalid filter format: {expression}. Expected format: column.operator.value")]
    Malformed { expression: String },

    /// The operator token is not in the operator table
    #[error("Invalid operator in filter '{expression}': unsupported filter operator '{operator}'")]
    UnsupportedOperator {
        expression: String,
        operator: String,
    },
}

impl FilterError {
    pub fn malformed(expression: &str) -> Self {
        Self::Malformed {
            expression: expression.to_string(),
        }
    }

    pub fn unsupported(expression: &str, operator: &str) -> Self {
        Self::UnsupportedOperator {
            expression: expression.to_string(),
            operator: operator.to_string(),
        }
    }

    /// Stable error kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "MalformedFilterError",
            Self::UnsupportedOperator { .. } => "UnsupportedOperatorError",
        }
    }
}
