//! Regression forecast model
//!
//! `yhat = trend * (1 + multiplicative_terms) + additive_terms`, where the
//! trend is piecewise linear (or piecewise logistic) with changepoints, and
//! the terms are Fourier seasonalities and holiday indicators. Coefficients
//! are MAP estimates under Gaussian priors, found by alternating ridge
//! regressions over the trend block and the component block.

use std::ops::Range;

use chrono::{Duration, NaiveDate};
use forecast_api::{ForecastConfig, Growth};
use forecast_spi::{
    ComponentSeries, Decomposition, FittedForecast, ForecastError, ForecastModel, ForecastResult,
    ForecastRow, ObservationSeries, Result, SeasonalityMode,
};

use crate::confidence::{bounds_from_standard_errors, trend_variance};
use crate::holidays::{HolidayColumn, HolidayFeatures};
use crate::seasonality::{resolve_seasonalities, SeasonalityTerm};
use crate::solver::ridge_solve;

/// Fewest observations accepted by [`RegressionForecaster::fit`].
pub const MIN_OBSERVATIONS: usize = 2;

/// Prior scale for the trend intercept and base growth rate.
const TREND_PRIOR_SCALE: f64 = 5.0;
const MIN_SIGMA2: f64 = 1e-8;
const LOGIT_CLAMP: f64 = 1e-6;

/// Unfitted regression forecast model.
#[derive(Debug, Clone, Default)]
pub struct RegressionForecaster {
    config: ForecastConfig,
}

impl RegressionForecaster {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

/// Piecewise trend in scaled units.
#[derive(Debug, Clone)]
struct Trend {
    /// Scaled `(cap, floor)` for logistic growth.
    bounds: Option<(f64, f64)>,
    changepoints: Vec<f64>,
    coef: Vec<f64>,
}

impl Trend {
    fn width(&self) -> usize {
        2 + self.changepoints.len()
    }

    fn linear(&self, t: f64) -> f64 {
        trend_features(&self.changepoints, t)
            .iter()
            .zip(&self.coef)
            .map(|(x, c)| x * c)
            .sum()
    }

    fn value(&self, t: f64) -> f64 {
        let z = self.linear(t);
        match self.bounds {
            None => z,
            Some((cap, floor)) => floor + (cap - floor) * sigmoid(z),
        }
    }

    fn deltas(&self) -> &[f64] {
        &self.coef[2..]
    }

    fn mean_abs_delta(&self) -> f64 {
        let deltas = self.deltas();
        if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        }
    }

    /// Map a logit-space variance to scaled units.
    fn variance_factor(&self) -> f64 {
        match self.bounds {
            None => 1.0,
            Some((cap, floor)) => ((cap - floor) / 4.0).powi(2),
        }
    }
}

/// `[1, t, (t - s_1)+, ..., (t - s_k)+]`
fn trend_features(changepoints: &[f64], t: f64) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len());
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|&s| (t - s).max(0.0)));
    row
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_CLAMP, 1.0 - LOGIT_CLAMP);
    (p / (1.0 - p)).ln()
}

/// Changepoints at evenly spaced rows of the first `range` of history,
/// excluding the first row.
fn place_changepoints(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = ((t.len() as f64) * range).floor() as usize;
    let count = n_changepoints.min(hist_size.saturating_sub(1));
    if count == 0 {
        return Vec::new();
    }
    let step = (hist_size - 1) as f64 / count as f64;
    (1..=count)
        .map(|i| t[(i as f64 * step).round() as usize])
        .collect()
}

/// A named group of component columns.
#[derive(Debug, Clone)]
struct ComponentBlock {
    name: String,
    mode: SeasonalityMode,
    columns: Range<usize>,
}

/// Seasonality and holiday columns with their coefficients.
#[derive(Debug, Clone)]
struct Components {
    terms: Vec<SeasonalityTerm>,
    holidays: HolidayFeatures,
    blocks: Vec<ComponentBlock>,
    coef: Vec<f64>,
}

impl Components {
    fn new(terms: Vec<SeasonalityTerm>, holidays: HolidayFeatures) -> Self {
        let mut blocks = Vec::with_capacity(terms.len() + 1);
        let mut start = 0;
        for term in &terms {
            blocks.push(ComponentBlock {
                name: term.name.clone(),
                mode: term.mode,
                columns: start..start + term.width(),
            });
            start += term.width();
        }
        if !holidays.is_empty() {
            blocks.push(ComponentBlock {
                name: "holidays".to_string(),
                mode: holidays.mode(),
                columns: start..start + holidays.width(),
            });
            start += holidays.width();
        }
        Self {
            terms,
            holidays,
            blocks,
            coef: vec![0.0; start],
        }
    }

    fn width(&self) -> usize {
        self.coef.len()
    }

    fn features(&self, date: NaiveDate) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());
        for term in &self.terms {
            term.push_features(date, &mut row);
        }
        self.holidays.push_features(date, &mut row);
        row
    }

    fn prior_scales(&self) -> Vec<f64> {
        let mut scales = Vec::with_capacity(self.width());
        for term in &self.terms {
            scales.extend(std::iter::repeat(term.prior_scale).take(term.width()));
        }
        scales.extend(self.holidays.columns().iter().map(|c| c.prior_scale));
        scales
    }

    fn column_modes(&self) -> Vec<SeasonalityMode> {
        let mut modes = vec![SeasonalityMode::Additive; self.width()];
        for block in &self.blocks {
            for m in &mut modes[block.columns.clone()] {
                *m = block.mode;
            }
        }
        modes
    }

    /// Per-block values for one feature row.
    fn block_values<'a>(&'a self, row: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        self.blocks.iter().map(move |block| {
            block
                .columns
                .clone()
                .map(|j| row[j] * self.coef[j])
                .sum::<f64>()
        })
    }

    /// `(additive, multiplicative)` totals for one feature row.
    fn totals(&self, row: &[f64]) -> (f64, f64) {
        self.blocks
            .iter()
            .zip(self.block_values(row))
            .fold((0.0, 0.0), |(add, mul), (block, v)| match block.mode {
                SeasonalityMode::Additive => (add + v, mul),
                SeasonalityMode::Multiplicative => (add, mul + v),
            })
    }
}

/// A fitted [`RegressionForecaster`].
#[derive(Debug, Clone)]
pub struct FittedRegression {
    config: ForecastConfig,
    history_dates: Vec<NaiveDate>,
    span_days: f64,
    y_scale: f64,
    trend: Trend,
    components: Components,
    sigma2: f64,
    kappa: f64,
    iterations: usize,
    converged: bool,
}

impl ForecastModel for RegressionForecaster {
    type Fitted = FittedRegression;

    fn fit(&self, history: &ObservationSeries) -> Result<FittedRegression> {
        let config = &self.config;
        let n = history.len();
        if n < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: n,
            });
        }

        let dates = history.dates();
        let first = dates[0];
        let span_days = (dates[n - 1] - first).num_days() as f64;
        let terms = resolve_seasonalities(config, span_days)?;
        let holidays = HolidayFeatures::new(
            &config.holidays,
            config.holidays_prior_scale,
            config.seasonality_mode,
            &dates,
        );

        let values = history.values();
        let y_scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if !(y_scale.is_finite() && y_scale > 0.0) {
            return Err(ForecastError::Numerical(
                "history has no non-zero values to scale by".to_string(),
            ));
        }
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();
        let t: Vec<f64> = dates
            .iter()
            .map(|d| (*d - first).num_days() as f64 / span_days)
            .collect();

        let bounds = match config.growth {
            Growth::Linear => None,
            Growth::Logistic { cap, floor } => Some((cap / y_scale, floor / y_scale)),
        };
        let changepoints = place_changepoints(&t, config.n_changepoints, config.changepoint_range);
        let mut trend = Trend {
            bounds,
            coef: vec![0.0; 2 + changepoints.len()],
            changepoints,
        };
        let trend_rows: Vec<Vec<f64>> = t
            .iter()
            .map(|&ti| trend_features(&trend.changepoints, ti))
            .collect();
        let mut trend_priors = vec![TREND_PRIOR_SCALE; 2];
        trend_priors.resize(trend.width(), config.changepoint_prior_scale);

        let mut components = Components::new(terms, holidays);
        let component_rows: Vec<Vec<f64>> = dates.iter().map(|&d| components.features(d)).collect();
        let component_priors = components.prior_scales();
        let modes = components.column_modes();

        let mut s_add = vec![0.0; n];
        let mut s_mul = vec![0.0; n];
        let mut sigma2 = initial_sigma2(&y);
        let mut previous: Option<Vec<f64>> = None;
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 1..=config.max_iterations {
            iterations = iteration;

            // Trend block
            trend.coef = match trend.bounds {
                None => {
                    let rows: Vec<Vec<f64>> = trend_rows
                        .iter()
                        .zip(&s_mul)
                        .map(|(row, m)| row.iter().map(|x| x * (1.0 + m)).collect())
                        .collect();
                    let target: Vec<f64> = y.iter().zip(&s_add).map(|(v, a)| v - a).collect();
                    ridge_solve(&rows, &target, &penalties(sigma2, &trend_priors))?
                }
                Some((cap, floor)) => {
                    let target: Vec<f64> = (0..n)
                        .map(|i| {
                            let factor = 1.0 + s_mul[i];
                            let factor = if factor.abs() < 1e-8 { 1.0 } else { factor };
                            logit(((y[i] - s_add[i]) / factor - floor) / (cap - floor))
                        })
                        .collect();
                    let logit_sigma2 = sigma2 * (4.0 / (cap - floor)).powi(2);
                    ridge_solve(&trend_rows, &target, &penalties(logit_sigma2, &trend_priors))?
                }
            };
            let g: Vec<f64> = t.iter().map(|&ti| trend.value(ti)).collect();

            // Component block
            if components.width() > 0 {
                let rows: Vec<Vec<f64>> = component_rows
                    .iter()
                    .zip(&g)
                    .map(|(row, &gi)| {
                        row.iter()
                            .zip(&modes)
                            .map(|(x, mode)| match mode {
                                SeasonalityMode::Additive => *x,
                                SeasonalityMode::Multiplicative => x * gi,
                            })
                            .collect()
                    })
                    .collect();
                let target: Vec<f64> = y.iter().zip(&g).map(|(v, gi)| v - gi).collect();
                components.coef = ridge_solve(&rows, &target, &penalties(sigma2, &component_priors))?;
                for (i, row) in component_rows.iter().enumerate() {
                    (s_add[i], s_mul[i]) = components.totals(row);
                }
            }

            let fitted: Vec<f64> = (0..n).map(|i| g[i] * (1.0 + s_mul[i]) + s_add[i]).collect();
            sigma2 = (y
                .iter()
                .zip(&fitted)
                .map(|(v, f)| (v - f).powi(2))
                .sum::<f64>()
                / n as f64)
                .max(MIN_SIGMA2);
            if !sigma2.is_finite() {
                return Err(ForecastError::Numerical(
                    "residual variance is not finite".to_string(),
                ));
            }

            let change = previous
                .as_ref()
                .map(|prev| {
                    prev.iter()
                        .zip(&fitted)
                        .map(|(a, b)| (a - b).abs())
                        .fold(0.0, f64::max)
                })
                .unwrap_or(f64::INFINITY);
            tracing::debug!(iteration, sigma = sigma2.sqrt(), change, "forecast fit iteration");
            previous = Some(fitted);
            if change < config.tolerance {
                converged = true;
                break;
            }
        }

        // largest squared multiplicative factor seen in history
        let kappa = if modes.contains(&SeasonalityMode::Multiplicative) {
            s_mul.iter().map(|m| (1.0 + m).powi(2)).fold(0.0, f64::max)
        } else {
            1.0
        };

        tracing::info!(
            observations = n,
            changepoints = trend.changepoints.len(),
            components = components.blocks.len(),
            iterations,
            converged,
            sigma = sigma2.sqrt() * y_scale,
            "fitted forecast model"
        );

        Ok(FittedRegression {
            config: config.clone(),
            history_dates: dates,
            span_days,
            y_scale,
            trend,
            components,
            sigma2,
            kappa,
            iterations,
            converged,
        })
    }
}

fn penalties(sigma2: f64, prior_scales: &[f64]) -> Vec<f64> {
    prior_scales.iter().map(|s| sigma2 / (s * s)).collect()
}

fn initial_sigma2(y: &[f64]) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let variance = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / y.len() as f64;
    variance.max(MIN_SIGMA2)
}

fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
    if dates.is_empty() {
        return Err(ForecastError::invalid("dates", "at least one date is required"));
    }
    if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
        return Err(ForecastError::invalid(
            "dates",
            format!(
                "dates must be strictly increasing ({} follows {})",
                pair[1], pair[0]
            ),
        ));
    }
    Ok(())
}

/// Model output for a set of dates, in units of y except multiplicative terms.
struct Evaluation {
    trend: Vec<f64>,
    additive: Vec<f64>,
    multiplicative: Vec<f64>,
    components: Vec<ComponentSeries>,
}

impl FittedRegression {
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history_dates
    }

    pub fn last_date(&self) -> NaiveDate {
        self.history_dates[self.history_dates.len() - 1]
    }

    /// Residual standard deviation of the fit, in units of y.
    pub fn sigma(&self) -> f64 {
        self.sigma2.sqrt() * self.y_scale
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn seasonalities(&self) -> &[SeasonalityTerm] {
        &self.components.terms
    }

    pub fn holiday_columns(&self) -> &[HolidayColumn] {
        self.components.holidays.columns()
    }

    pub fn changepoint_dates(&self) -> Vec<NaiveDate> {
        let first = self.history_dates[0];
        self.trend
            .changepoints
            .iter()
            .map(|s| first + Duration::days((s * self.span_days).round() as i64))
            .collect()
    }

    /// Fitted rate changes at each changepoint, in scaled units.
    pub fn changepoint_deltas(&self) -> &[f64] {
        self.trend.deltas()
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.history_dates[0]).num_days() as f64 / self.span_days
    }

    fn evaluate(&self, dates: &[NaiveDate]) -> Result<Evaluation> {
        validate_dates(dates)?;
        let blocks = &self.components.blocks;
        let mut trend = Vec::with_capacity(dates.len());
        let mut additive = Vec::with_capacity(dates.len());
        let mut multiplicative = Vec::with_capacity(dates.len());
        let mut block_values: Vec<Vec<f64>> = vec![Vec::with_capacity(dates.len()); blocks.len()];

        for &date in dates {
            trend.push(self.trend.value(self.scaled_time(date)) * self.y_scale);
            let row = self.components.features(date);
            let (mut add, mut mul) = (0.0, 0.0);
            for ((block, v), out) in blocks
                .iter()
                .zip(self.components.block_values(&row))
                .zip(block_values.iter_mut())
            {
                match block.mode {
                    SeasonalityMode::Additive => {
                        add += v;
                        out.push(v * self.y_scale);
                    }
                    SeasonalityMode::Multiplicative => {
                        mul += v;
                        out.push(v);
                    }
                }
            }
            additive.push(add * self.y_scale);
            multiplicative.push(mul);
        }

        let mut components = Vec::with_capacity(blocks.len() + 1);
        components.push(ComponentSeries {
            name: "trend".to_string(),
            mode: SeasonalityMode::Additive,
            values: trend.clone(),
        });
        components.extend(
            blocks
                .iter()
                .zip(block_values)
                .map(|(block, values)| ComponentSeries {
                    name: block.name.clone(),
                    mode: block.mode,
                    values,
                }),
        );

        Ok(Evaluation {
            trend,
            additive,
            multiplicative,
            components,
        })
    }

    /// Standard error at `date`: observation noise plus accumulated trend
    /// uncertainty past the last training date.
    fn standard_error(&self, date: NaiveDate) -> f64 {
        let dt = (self.scaled_time(date) - 1.0).max(0.0);
        let rate = self.trend.changepoints.len() as f64;
        let trend_var = trend_variance(rate, self.trend.mean_abs_delta(), dt)
            * self.trend.variance_factor();
        (self.sigma2 + self.kappa * trend_var).sqrt() * self.y_scale
    }
}

impl FittedForecast for FittedRegression {
    fn predict(&self, horizon_days: usize) -> Result<ForecastResult> {
        let last = self.last_date();
        let mut dates = self.history_dates.clone();
        dates.extend((1..=horizon_days as i64).map(|d| last + Duration::days(d)));
        self.predict_dates(&dates)
    }

    fn predict_dates(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        let evaluation = self.evaluate(dates)?;
        let yhat: Vec<f64> = (0..dates.len())
            .map(|i| {
                evaluation.trend[i] * (1.0 + evaluation.multiplicative[i])
                    + evaluation.additive[i]
            })
            .collect();
        let std_errors: Vec<f64> = dates.iter().map(|&d| self.standard_error(d)).collect();
        let (lower, upper) =
            bounds_from_standard_errors(&yhat, &std_errors, self.config.interval_width)?;

        let last = self.last_date();
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, &date)| ForecastRow {
                date,
                yhat: yhat[i],
                yhat_lower: lower[i],
                yhat_upper: upper[i],
                trend: evaluation.trend[i],
                additive_terms: evaluation.additive[i],
                multiplicative_terms: evaluation.multiplicative[i],
                is_forecast: date > last,
            })
            .collect();

        Ok(ForecastResult {
            seasonality_mode: self.config.seasonality_mode,
            interval_width: self.config.interval_width,
            rows,
            components: evaluation.components,
        })
    }

    fn decompose(&self, dates: &[NaiveDate]) -> Result<Decomposition> {
        let evaluation = self.evaluate(dates)?;
        Ok(Decomposition {
            dates: dates.to_vec(),
            components: evaluation.components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::HolidayCalendarBuilder;
    use crate::seasonality::epoch_days;
    use chrono::Datelike;
    use financial_spi::PriceSeries;
    use std::f64::consts::PI;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(n: usize, f: impl Fn(usize, NaiveDate) -> f64) -> PriceSeries {
        let dates: Vec<NaiveDate> = d(2024, 1, 1).iter_days().take(n).collect();
        let values: Vec<f64> = dates.iter().enumerate().map(|(i, &day)| f(i, day)).collect();
        PriceSeries::from_parts(&dates, &values).unwrap()
    }

    fn weekly_wave(date: NaiveDate) -> f64 {
        (2.0 * PI * epoch_days(date) / 7.0).sin()
    }

    fn no_weekly() -> ForecastConfig {
        ForecastConfig::new().with_weekly_seasonality(false)
    }

    #[test]
    fn test_recovers_linear_trend() {
        let history = series(120, |i, _| 10.0 + 0.05 * i as f64);
        let fitted = RegressionForecaster::new(no_weekly())
            .unwrap()
            .fit_prices(&history)
            .unwrap();
        let result = fitted.predict(30).unwrap();
        assert_eq!(result.len(), 150);
        assert_eq!(result.future().count(), 30);

        let last = result.rows.last().unwrap();
        assert_eq!(last.date, d(2024, 1, 1) + Duration::days(149));
        assert!((last.yhat - (10.0 + 0.05 * 149.0)).abs() < 0.05);
        assert!(fitted.sigma() < 0.01);
    }

    #[test]
    fn test_recovers_weekly_pattern() {
        let history = series(140, |i, day| 50.0 + 0.02 * i as f64 + 2.0 * weekly_wave(day));
        let fitted = RegressionForecaster::default().fit_prices(&history).unwrap();
        assert_eq!(fitted.seasonalities().len(), 1);

        let future: Vec<NaiveDate> = d(2024, 6, 1).iter_days().take(14).collect();
        let decomposition = fitted.decompose(&future).unwrap();
        assert_eq!(decomposition.names(), vec!["trend", "weekly"]);
        let weekly = decomposition.component("weekly").unwrap();
        assert_eq!(weekly.mode, SeasonalityMode::Additive);
        for (value, &day) in weekly.values.iter().zip(&future) {
            assert!((value - 2.0 * weekly_wave(day)).abs() < 0.1);
        }
    }

    #[test]
    fn test_multiplicative_combination() {
        let history = series(140, |i, day| {
            (20.0 + 0.05 * i as f64) * (1.0 + 0.05 * weekly_wave(day))
        });
        let config = ForecastConfig::new().with_seasonality_mode(SeasonalityMode::Multiplicative);
        let fitted = RegressionForecaster::new(config).unwrap().fit_prices(&history).unwrap();
        let result = fitted.predict(21).unwrap();

        assert_eq!(result.seasonality_mode, SeasonalityMode::Multiplicative);
        assert_eq!(
            result.component("weekly").unwrap().mode,
            SeasonalityMode::Multiplicative
        );
        for row in &result.rows {
            assert_eq!(row.additive_terms, 0.0);
            let combined = row.trend * (1.0 + row.multiplicative_terms) + row.additive_terms;
            assert!((row.yhat - combined).abs() < 1e-9);
        }
        for (row, point) in result.rows.iter().zip(history.points()) {
            assert!((row.yhat - point.price).abs() < 0.5);
        }
    }

    #[test]
    fn test_holiday_effect() {
        let mid_month: Vec<NaiveDate> = (1..=12).map(|m| d(2024, m, 15)).collect();
        let calendar = HolidayCalendarBuilder::new()
            .with_closures("mid-month", &mid_month)
            .build()
            .unwrap();
        let history = series(180, |i, day| {
            let spike = if day.day() == 15 { 5.0 } else { 0.0 };
            50.0 + 0.01 * i as f64 + spike
        });
        let fitted = RegressionForecaster::new(no_weekly().with_holidays(calendar))
            .unwrap()
            .fit_prices(&history)
            .unwrap();
        assert_eq!(fitted.holiday_columns().len(), 1);

        let dates = [d(2024, 5, 15), d(2024, 8, 14), d(2024, 8, 15)];
        let decomposition = fitted.decompose(&dates).unwrap();
        assert_eq!(decomposition.names(), vec!["trend", "holidays"]);
        let holidays = &decomposition.component("holidays").unwrap().values;
        assert!((holidays[0] - 5.0).abs() < 0.5);
        assert_eq!(holidays[1], 0.0);
        assert!((holidays[2] - 5.0).abs() < 0.5);
    }

    #[test]
    fn test_logistic_growth_stays_within_bounds() {
        let history = series(120, |i, _| {
            10.0 + 80.0 / (1.0 + (-(i as f64 - 60.0) / 15.0).exp())
        });
        let config = no_weekly().with_growth(Growth::Logistic {
            cap: 100.0,
            floor: 0.0,
        });
        let fitted = RegressionForecaster::new(config).unwrap().fit_prices(&history).unwrap();
        let result = fitted.predict(3650).unwrap();
        for row in &result.rows {
            assert!(row.trend <= 100.0 + 1e-9 && row.trend >= 0.0);
        }
        let last = history.last().unwrap().price;
        let fitted_last = result.rows[119].yhat;
        assert!((fitted_last - last).abs() < 3.0);
    }

    #[test]
    fn test_intervals_widen_with_horizon() {
        let history = series(200, |i, _| {
            let x = i as f64;
            30.0 + 0.03 * x + 0.5 * (x * 1.3).sin() + 0.3 * (x * 2.9).cos()
        });
        let fitted = RegressionForecaster::new(no_weekly())
            .unwrap()
            .fit_prices(&history)
            .unwrap();
        let result = fitted.predict(120).unwrap();

        for row in &result.rows {
            assert!(row.yhat_lower <= row.yhat && row.yhat <= row.yhat_upper);
        }
        let in_sample: Vec<f64> = result
            .rows
            .iter()
            .filter(|r| !r.is_forecast)
            .map(|r| r.yhat_upper - r.yhat_lower)
            .collect();
        assert!(in_sample.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-9));

        let widths: Vec<f64> = result
            .future()
            .map(|r| r.yhat_upper - r.yhat_lower)
            .collect();
        assert!(widths.windows(2).all(|w| w[1] >= w[0] - 1e-12));
        assert!(widths[widths.len() - 1] > widths[0]);
        assert!(widths[0] >= in_sample[0] - 1e-12);
    }

    #[test]
    fn test_changepoints_within_range() {
        let history = series(100, |i, _| 10.0 + i as f64 * 0.1);
        let fitted = RegressionForecaster::new(no_weekly())
            .unwrap()
            .fit_prices(&history)
            .unwrap();
        let changepoints = fitted.changepoint_dates();
        assert_eq!(changepoints.len(), 25);
        assert_eq!(fitted.changepoint_deltas().len(), 25);
        assert!(changepoints.windows(2).all(|w| w[0] < w[1]));
        assert!(*changepoints.last().unwrap() <= d(2024, 1, 1) + Duration::days(79));
    }

    #[test]
    fn test_place_changepoints_short_history() {
        let t = vec![0.0, 1.0];
        assert!(place_changepoints(&t, 25, 0.8).is_empty());
        let t: Vec<f64> = (0..11).map(|i| i as f64 / 10.0).collect();
        assert_eq!(place_changepoints(&t, 25, 0.8), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_fits_negative_returns() {
        let dates: Vec<NaiveDate> = d(2024, 1, 1).iter_days().take(140).collect();
        let values: Vec<f64> = dates
            .iter()
            .map(|&day| 0.01 * weekly_wave(day) - 0.002)
            .collect();
        let history = ObservationSeries::from_parts(&dates, &values).unwrap();
        let fitted = RegressionForecaster::default().fit(&history).unwrap();
        let result = fitted.predict(14).unwrap();

        assert!(result.rows.iter().any(|r| r.yhat < 0.0));
        for (row, value) in result.rows.iter().zip(&values) {
            assert!((row.yhat - value).abs() < 0.002);
        }
        for row in result.future() {
            assert!(row.yhat_lower < row.yhat && row.yhat < row.yhat_upper);
        }
    }

    #[test]
    fn test_insufficient_observations() {
        let history = series(1, |_, _| 10.0);
        let err = RegressionForecaster::default().fit_prices(&history).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_short_history_for_weekly_seasonality() {
        let history = series(10, |i, _| 10.0 + i as f64);
        let err = RegressionForecaster::default().fit_prices(&history).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory { .. }));
        assert!(RegressionForecaster::new(no_weekly())
            .unwrap()
            .fit_prices(&history)
            .is_ok());
    }

    #[test]
    fn test_predict_dates_validation() {
        let history = series(30, |i, _| 10.0 + i as f64);
        let fitted = RegressionForecaster::new(no_weekly())
            .unwrap()
            .fit_prices(&history)
            .unwrap();
        assert!(matches!(
            fitted.predict_dates(&[]),
            Err(ForecastError::InvalidConfiguration { .. })
        ));
        assert!(fitted
            .predict_dates(&[d(2024, 3, 2), d(2024, 3, 1)])
            .is_err());
        let single = fitted.predict_dates(&[d(2024, 3, 1)]).unwrap();
        assert!(single.rows[0].is_forecast);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ForecastConfig::new().with_interval_width(1.5);
        assert!(RegressionForecaster::new(config).is_err());
    }
}
