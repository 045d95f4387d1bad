//! Trait for fit/predict forecast models

use chrono::NaiveDate;
use financial_spi::{PriceSeries, ReturnSeries};

use crate::error::Result;
use crate::model::{Decomposition, ForecastResult, ObservationSeries};

/// An unfitted forecast model that can be fitted to history.
pub trait ForecastModel: Send + Sync {
    /// The fitted model produced by [`ForecastModel::fit`].
    type Fitted: FittedForecast;

    /// Fit the model to dated `(date, y)` observations.
    fn fit(&self, history: &ObservationSeries) -> Result<Self::Fitted>;

    /// Fit to closing prices.
    fn fit_prices(&self, prices: &PriceSeries) -> Result<Self::Fitted> {
        self.fit(&ObservationSeries::from(prices))
    }

    /// Fit to a return series; values may be negative.
    fn fit_returns(&self, returns: &ReturnSeries) -> Result<Self::Fitted> {
        self.fit(&ObservationSeries::from(returns))
    }
}

/// A fitted forecast model.
pub trait FittedForecast: Send + Sync {
    /// Predict over the training dates plus `horizon_days` future calendar days.
    fn predict(&self, horizon_days: usize) -> Result<ForecastResult>;

    /// Predict for arbitrary strictly increasing dates.
    fn predict_dates(&self, dates: &[NaiveDate]) -> Result<ForecastResult>;

    /// Named component series for the given dates.
    fn decompose(&self, dates: &[NaiveDate]) -> Result<Decomposition>;
}
