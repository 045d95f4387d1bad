//! Forecast result and decomposition models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// How seasonal and holiday components combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    /// `yhat = trend + components`
    #[default]
    Additive,
    /// `yhat = trend * (1 + components)`
    Multiplicative,
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalityMode::Additive => write!(f, "additive"),
            SeasonalityMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for SeasonalityMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(SeasonalityMode::Additive),
            "multiplicative" => Ok(SeasonalityMode::Multiplicative),
            other => Err(ForecastError::invalid(
                "seasonality_mode",
                format!("unknown mode '{other}', expected additive or multiplicative"),
            )),
        }
    }
}

/// One forecast row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
    /// Sum of additive components, in units of y.
    pub additive_terms: f64,
    /// Sum of multiplicative components, as a fraction of trend.
    pub multiplicative_terms: f64,
    /// True for dates after the last training date.
    pub is_forecast: bool,
}

/// A named component aligned with the forecast dates.
///
/// Additive components are in units of y, multiplicative components are
/// fractions of the trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSeries {
    pub name: String,
    pub mode: SeasonalityMode,
    pub values: Vec<f64>,
}

/// Forecast rows plus named components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub seasonality_mode: SeasonalityMode,
    pub interval_width: f64,
    pub rows: Vec<ForecastRow>,
    pub components: Vec<ComponentSeries>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn yhat(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.yhat).collect()
    }

    /// Rows after the training period.
    pub fn future(&self) -> impl Iterator<Item = &ForecastRow> {
        self.rows.iter().filter(|r| r.is_forecast)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSeries> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Named component series for a set of dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub dates: Vec<NaiveDate>,
    pub components: Vec<ComponentSeries>,
}

impl Decomposition {
    pub fn component(&self, name: &str) -> Option<&ComponentSeries> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }
}
