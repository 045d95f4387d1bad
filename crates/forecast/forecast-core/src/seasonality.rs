//! Fourier seasonality terms
//!
//! Resolves the built-in yearly and weekly terms plus custom terms from a
//! [`ForecastConfig`] and builds their Fourier features.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};
use forecast_api::{ForecastConfig, YearlySeasonality};
use forecast_spi::{ForecastError, Result, SeasonalityMode};

pub const YEARLY_PERIOD_DAYS: f64 = 365.25;
pub const WEEKLY_PERIOD_DAYS: f64 = 7.0;
/// Yearly order used when yearly seasonality is automatic.
pub const AUTO_YEARLY_ORDER: usize = 10;
pub const WEEKLY_ORDER: usize = 3;

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Periods of history required per seasonal cycle.
pub const MIN_CYCLES: f64 = 2.0;

/// A resolved seasonal component.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityTerm {
    pub name: String,
    pub period_days: f64,
    pub fourier_order: usize,
    pub prior_scale: f64,
    pub mode: SeasonalityMode,
    /// False for automatically enabled terms.
    pub explicit: bool,
}

impl SeasonalityTerm {
    /// Number of feature columns (`sin` and `cos` per order).
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }

    /// Append this term's features for `date` to `out`.
    pub fn push_features(&self, date: NaiveDate, out: &mut Vec<f64>) {
        fourier_features_into(epoch_days(date), self.period_days, self.fourier_order, out);
    }

    pub fn features(&self, date: NaiveDate) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        self.push_features(date, &mut out);
        out
    }
}

/// Days since 1970-01-01.
pub fn epoch_days(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}

/// `[sin(2 pi 1 t / P), cos(2 pi 1 t / P), ..., sin(2 pi n t / P), cos(2 pi n t / P)]`
pub fn fourier_features(t_days: f64, period_days: f64, order: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(2 * order);
    fourier_features_into(t_days, period_days, order, &mut out);
    out
}

fn fourier_features_into(t_days: f64, period_days: f64, order: usize, out: &mut Vec<f64>) {
    for n in 1..=order {
        let angle = 2.0 * PI * n as f64 * t_days / period_days;
        out.push(angle.sin());
        out.push(angle.cos());
    }
}

fn same_period(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Resolve the active seasonality terms for a history spanning `span_days`.
///
/// A custom term replaces a built-in with the same name or period. Automatic
/// yearly seasonality is only enabled with at least two years of history;
/// an explicit term whose period needs more history than is available fails
/// with [`ForecastError::InsufficientHistory`].
pub fn resolve_seasonalities(config: &ForecastConfig, span_days: f64) -> Result<Vec<SeasonalityTerm>> {
    let builtin = |name: &str, period_days: f64, fourier_order: usize, explicit: bool| {
        SeasonalityTerm {
            name: name.to_string(),
            period_days,
            fourier_order,
            prior_scale: config.seasonality_prior_scale,
            mode: config.seasonality_mode,
            explicit,
        }
    };

    let mut terms = Vec::new();
    match config.yearly_seasonality {
        YearlySeasonality::Auto if span_days >= MIN_CYCLES * YEARLY_PERIOD_DAYS => {
            terms.push(builtin("yearly", YEARLY_PERIOD_DAYS, AUTO_YEARLY_ORDER, false));
        }
        YearlySeasonality::Order(order) => {
            terms.push(builtin("yearly", YEARLY_PERIOD_DAYS, order, true));
        }
        _ => {}
    }
    if config.weekly_seasonality {
        terms.push(builtin("weekly", WEEKLY_PERIOD_DAYS, WEEKLY_ORDER, true));
    }

    for custom in &config.custom_seasonalities {
        terms.retain(|t| t.name != custom.name && !same_period(t.period_days, custom.period_days));
        terms.push(SeasonalityTerm {
            name: custom.name.clone(),
            period_days: custom.period_days,
            fourier_order: custom.fourier_order,
            prior_scale: custom.prior_scale.unwrap_or(config.seasonality_prior_scale),
            mode: custom.mode.unwrap_or(config.seasonality_mode),
            explicit: true,
        });
    }

    if let Some(term) = terms
        .iter()
        .filter(|t| t.explicit)
        .max_by(|a, b| a.period_days.total_cmp(&b.period_days))
    {
        let required_days = MIN_CYCLES * term.period_days;
        if span_days < required_days {
            return Err(ForecastError::InsufficientHistory {
                required_days,
                actual_days: span_days,
            });
        }
    }

    tracing::debug!(
        terms = ?terms.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        span_days,
        "resolved seasonalities"
    );
    Ok(terms)
}
