//! Financial analytics error types.

use thiserror::Error;

/// Financial analytics errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinancialError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Misaligned series: {overlap} common dates, at least {required} required")]
    MisalignedSeries { overlap: usize, required: usize },

    #[error("Invalid configuration: {name} - {reason}")]
    InvalidConfiguration { name: String, reason: String },

    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl FinancialError {
    /// Shorthand for an [`FinancialError::InvalidConfiguration`] error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        FinancialError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for financial operations.
pub type Result<T> = std::result::Result<T, FinancialError>;
