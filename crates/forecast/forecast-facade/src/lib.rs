//! Forecast Facade
//!
//! High-level API for fitting the regression forecast model to a price
//! series and predicting with uncertainty bounds and named components.
//! Re-exports all public types from the forecast stack for convenient usage.
//!
//! ```ignore
//! use forecast::{FittedForecast, ForecastConfig, ForecastModel, RegressionForecaster};
//!
//! let model = RegressionForecaster::new(ForecastConfig::default())?;
//! let fitted = model.fit_prices(&history)?;
//! let result = fitted.predict(365)?;
//! ```

// Re-export everything from API (which includes the SPI models)
pub use forecast_api::*;

// Re-export core modules for direct access
pub use forecast_core::{confidence, holidays, model, seasonality, solver};

// Re-export model types at root
pub use forecast_core::{
    FittedRegression, HolidayCalendarBuilder, HolidayColumn, HolidayFeatures,
    RegressionForecaster, SeasonalityTerm, MIN_OBSERVATIONS,
};

// Re-export SPI traits and result models
pub use forecast_spi::{
    ComponentSeries, Decomposition, FittedForecast, ForecastModel, ForecastResult, ForecastRow,
};
