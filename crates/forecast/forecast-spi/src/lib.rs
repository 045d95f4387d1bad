//! Forecast Service Provider Interface
//!
//! Defines the observation series, the holiday calendar, forecast result and decomposition models,
//! the forecast error type and the fit/predict contract.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{FittedForecast, ForecastModel};
pub use error::{ForecastError, Result};
pub use model::{
    ComponentSeries, Decomposition, ForecastResult, ForecastRow, HolidayCalendar, HolidayEntry,
    Observation, ObservationSeries, SeasonalityMode,
};
