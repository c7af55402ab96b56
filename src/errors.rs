use thiserror::Error;

use crate::types::LoanId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanError {
    #[error("invalid input for {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("loan already returned: {id}")]
    LoanClosed {
        id: LoanId,
    },

    #[error("amount overflow: {context}")]
    AmountOverflow {
        context: &'static str,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LoanError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// true for the calculator's single failure kind
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LoanError::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
