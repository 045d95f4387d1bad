//! Forecast error types

use financial_spi::FinancialError;
use thiserror::Error;

/// Errors that can occur during forecasting operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// History spans too few days for a requested seasonality
    #[error("Insufficient history: need at least {required_days} days, got {actual_days}")]
    InsufficientHistory { required_days: f64, actual_days: f64 },

    /// Invalid configuration value
    #[error("Invalid configuration '{name}': {reason}")]
    InvalidConfiguration { name: String, reason: String },

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Error raised by the underlying series types
    #[error(transparent)]
    Financial(#[from] FinancialError),
}

impl ForecastError {
    /// Shorthand for an [`ForecastError::InvalidConfiguration`] error.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ForecastError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for both observation-count and history-span shortfalls.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. }
                | ForecastError::InsufficientHistory { .. }
                | ForecastError::Financial(FinancialError::InsufficientData { .. })
        )
    }
}
