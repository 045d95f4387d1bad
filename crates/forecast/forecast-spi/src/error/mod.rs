//! Error types for forecasting operations

mod forecast_error;

pub use forecast_error::ForecastError;

/// Result type alias for forecast operations
pub type Result<T> = std::result::Result<T, ForecastError>;
