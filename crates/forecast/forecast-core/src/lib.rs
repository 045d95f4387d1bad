//! Forecast Core
//!
//! Regression forecast model with piecewise trend, Fourier seasonality and
//! holiday effects, plus the holiday calendar builder, ridge solver and
//! uncertainty intervals it is built from.

pub mod confidence;
pub mod holidays;
pub mod model;
pub mod seasonality;
pub mod solver;

// Re-export SPI traits for implementations
pub use forecast_spi::{FittedForecast, ForecastError, ForecastModel, Result};

// Re-export main types
pub use holidays::{HolidayCalendarBuilder, HolidayColumn, HolidayFeatures};
pub use model::{FittedRegression, RegressionForecaster, MIN_OBSERVATIONS};
pub use seasonality::SeasonalityTerm;
