//! Data models for forecasting

mod forecast_result;
mod holiday;
mod observation;

pub use forecast_result::{
    ComponentSeries, Decomposition, ForecastResult, ForecastRow, SeasonalityMode,
};
pub use holiday::{HolidayCalendar, HolidayEntry};
pub use observation::{Observation, ObservationSeries};
