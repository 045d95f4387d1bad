//! Forecast configuration types.

use std::collections::HashSet;

use forecast_spi::{ForecastError, HolidayCalendar, Result, SeasonalityMode};
use serde::{Deserialize, Serialize};

/// Component names used by the model itself.
pub const RESERVED_COMPONENT_NAMES: [&str; 2] = ["trend", "holidays"];

/// Trend growth model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Growth {
    /// Piecewise-linear trend.
    #[default]
    Linear,
    /// Piecewise-logistic trend saturating between `floor` and `cap`.
    Logistic { cap: f64, floor: f64 },
}

/// Yearly seasonality setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearlySeasonality {
    /// Order 10 when the history spans at least two years.
    #[default]
    Auto,
    Disabled,
    /// Explicit Fourier order.
    Order(usize),
}

/// A user-defined Fourier seasonality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSeasonality {
    pub name: String,
    /// Period in days.
    pub period_days: f64,
    pub fourier_order: usize,
    /// Falls back to the model-wide seasonality prior scale.
    #[serde(default)]
    pub prior_scale: Option<f64>,
    /// Falls back to the model-wide seasonality mode.
    #[serde(default)]
    pub mode: Option<SeasonalityMode>,
}

impl CustomSeasonality {
    pub fn new(name: impl Into<String>, period_days: f64, fourier_order: usize) -> Self {
        Self {
            name: name.into(),
            period_days,
            fourier_order,
            prior_scale: None,
            mode: None,
        }
    }

    pub fn with_prior_scale(mut self, prior_scale: f64) -> Self {
        self.prior_scale = Some(prior_scale);
        self
    }

    pub fn with_mode(mut self, mode: SeasonalityMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Configuration for the regression forecast model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub growth: Growth,
    pub seasonality_mode: SeasonalityMode,
    pub yearly_seasonality: YearlySeasonality,
    /// Weekly seasonality of order 3.
    pub weekly_seasonality: bool,
    pub custom_seasonalities: Vec<CustomSeasonality>,
    pub holidays: HolidayCalendar,
    pub holidays_prior_scale: f64,
    /// Number of potential trend changepoints.
    pub n_changepoints: usize,
    /// Fraction of history in which changepoints are placed.
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    /// Coverage of the uncertainty interval.
    pub interval_width: f64,
    /// Maximum trend/component alternation rounds.
    pub max_iterations: usize,
    /// Convergence threshold on the change in scaled fitted values.
    pub tolerance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            growth: Growth::Linear,
            seasonality_mode: SeasonalityMode::Additive,
            yearly_seasonality: YearlySeasonality::Auto,
            weekly_seasonality: true,
            custom_seasonalities: Vec::new(),
            holidays: HolidayCalendar::empty(),
            holidays_prior_scale: 10.0,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            interval_width: 0.8,
            max_iterations: 100,
            tolerance: 1e-9,
        }
    }
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_seasonality_mode(mut self, mode: SeasonalityMode) -> Self {
        self.seasonality_mode = mode;
        self
    }

    pub fn with_yearly_seasonality(mut self, yearly: YearlySeasonality) -> Self {
        self.yearly_seasonality = yearly;
        self
    }

    pub fn with_weekly_seasonality(mut self, enabled: bool) -> Self {
        self.weekly_seasonality = enabled;
        self
    }

    pub fn add_seasonality(mut self, seasonality: CustomSeasonality) -> Self {
        self.custom_seasonalities.push(seasonality);
        self
    }

    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_changepoints(mut self, n_changepoints: usize, changepoint_range: f64) -> Self {
        self.n_changepoints = n_changepoints;
        self.changepoint_range = changepoint_range;
        self
    }

    pub fn with_changepoint_prior_scale(mut self, prior_scale: f64) -> Self {
        self.changepoint_prior_scale = prior_scale;
        self
    }

    pub fn with_interval_width(mut self, interval_width: f64) -> Self {
        self.interval_width = interval_width;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Growth::Logistic { cap, floor } = self.growth {
            if !(cap.is_finite() && floor.is_finite() && cap > floor) {
                return Err(ForecastError::invalid(
                    "growth",
                    format!("logistic cap must exceed floor (cap {cap}, floor {floor})"),
                ));
            }
        }
        if let YearlySeasonality::Order(0) = self.yearly_seasonality {
            return Err(ForecastError::invalid(
                "yearly_seasonality",
                "fourier order must be at least 1",
            ));
        }
        positive("holidays_prior_scale", self.holidays_prior_scale)?;
        positive("changepoint_prior_scale", self.changepoint_prior_scale)?;
        positive("seasonality_prior_scale", self.seasonality_prior_scale)?;
        positive("tolerance", self.tolerance)?;
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::invalid(
                "changepoint_range",
                format!("must be in (0, 1], got {}", self.changepoint_range),
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::invalid(
                "interval_width",
                format!("must be in (0, 1), got {}", self.interval_width),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ForecastError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }

        let mut names = HashSet::new();
        for custom in &self.custom_seasonalities {
            if custom.name.trim().is_empty() {
                return Err(ForecastError::invalid(
                    "custom_seasonalities",
                    "seasonality name must not be empty",
                ));
            }
            if RESERVED_COMPONENT_NAMES.contains(&custom.name.as_str()) {
                return Err(ForecastError::invalid(
                    "custom_seasonalities",
                    format!("'{}' is a reserved component name", custom.name),
                ));
            }
            if !names.insert(custom.name.as_str()) {
                return Err(ForecastError::invalid(
                    "custom_seasonalities",
                    format!("duplicate seasonality name '{}'", custom.name),
                ));
            }
            positive(&format!("{}.period_days", custom.name), custom.period_days)?;
            if custom.fourier_order == 0 {
                return Err(ForecastError::invalid(
                    format!("{}.fourier_order", custom.name),
                    "must be at least 1",
                ));
            }
            if let Some(scale) = custom.prior_scale {
                positive(&format!("{}.prior_scale", custom.name), scale)?;
            }
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ForecastError::invalid(
            name,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}
