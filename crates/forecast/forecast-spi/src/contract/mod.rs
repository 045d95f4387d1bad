//! Trait definitions for forecasting

mod forecast_model;

pub use forecast_model::{FittedForecast, ForecastModel};
