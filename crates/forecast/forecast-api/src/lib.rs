//! Forecast Consumer API
//!
//! Configuration types for the regression forecast model.
//!
//! This crate provides:
//! - `ForecastConfig` with growth, seasonality, holiday and fitting settings
//! - Builder methods and validation for those settings
//! - Re-exports from SPI for convenience

pub mod config;

pub use config::{
    CustomSeasonality, ForecastConfig, Growth, YearlySeasonality, RESERVED_COMPONENT_NAMES,
};

// Re-export types from SPI
pub use forecast_spi::{
    ForecastError, HolidayCalendar, HolidayEntry, Observation, ObservationSeries, Result,
    SeasonalityMode,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CustomSeasonality, ForecastConfig, Growth, YearlySeasonality};
    pub use forecast_spi::{
        ComponentSeries, Decomposition, FittedForecast, ForecastError, ForecastModel,
        ForecastResult, ForecastRow, HolidayCalendar, HolidayEntry, ObservationSeries, Result,
        SeasonalityMode,
    };
}
