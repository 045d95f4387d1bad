//! End-to-end tests for the forecast crate
//!
//! Fits a year of trading-day closes and projects the following year, the
//! way the equity analysis workflow uses the model.

use chrono::{Duration, NaiveDate};
use financial::{us_business_days, PriceSeries};
use forecast::{
    CustomSeasonality, FittedForecast, ForecastConfig, ForecastModel, ForecastResult,
    HolidayCalendarBuilder, RegressionForecaster, SeasonalityMode, YearlySeasonality,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn closes_2024() -> PriceSeries {
    let days = us_business_days(d(2024, 1, 1), d(2024, 12, 31)).unwrap();
    let values: Vec<f64> = (0..days.len())
        .map(|i| {
            let x = i as f64;
            120.0 + 0.08 * x + 4.0 * (x / 11.0).sin() + 1.5 * (x * 0.9).cos()
        })
        .collect();
    PriceSeries::from_parts(&days, &values).unwrap()
}

fn tuned_config() -> ForecastConfig {
    let calendar = HolidayCalendarBuilder::new()
        .with_us_federal(2024..=2025)
        .unwrap()
        .with_nyse_closures(2024..=2025)
        .unwrap()
        .with_nyse_early_closes(2024..=2025)
        .unwrap()
        .with_event(
            "Earning releases",
            &[
                d(2024, 4, 25),
                d(2024, 7, 30),
                d(2024, 10, 31),
                d(2025, 2, 4),
                d(2025, 4, 24),
            ],
            14,
            28,
        )
        .build()
        .unwrap();

    ForecastConfig::new()
        .with_seasonality_mode(SeasonalityMode::Multiplicative)
        .with_yearly_seasonality(YearlySeasonality::Disabled)
        .with_weekly_seasonality(false)
        .add_seasonality(CustomSeasonality::new("weekly", 7.0, 4).with_prior_scale(0.01))
        .with_holidays(calendar)
}

fn assert_well_formed(result: &ForecastResult) {
    for row in &result.rows {
        assert!(row.yhat.is_finite());
        assert!(row.yhat_lower <= row.yhat && row.yhat <= row.yhat_upper);
    }
    let widths: Vec<f64> = result
        .future()
        .map(|r| r.yhat_upper - r.yhat_lower)
        .collect();
    assert!(widths.windows(2).all(|w| w[1] >= w[0] - 1e-9));
}

#[test]
fn e2e_baseline_forecast_for_next_year() {
    let history = closes_2024();
    let fitted = RegressionForecaster::default().fit_prices(&history).unwrap();
    let result = fitted.predict(365).unwrap();

    assert_eq!(result.len(), history.len() + 365);
    assert_eq!(result.future().count(), 365);
    assert_eq!(result.future().last().unwrap().date, d(2025, 12, 31));
    assert_eq!(result.seasonality_mode, SeasonalityMode::Additive);
    assert_well_formed(&result);

    // in-sample fit tracks the history
    let errors: Vec<f64> = result
        .rows
        .iter()
        .zip(history.points())
        .map(|(row, point)| (row.yhat - point.price).abs())
        .collect();
    let mean_error = errors.iter().sum::<f64>() / errors.len() as f64;
    assert!(mean_error < 5.0);
}

#[test]
fn e2e_tuned_forecast_with_holidays_and_events() {
    let history = closes_2024();
    let model = RegressionForecaster::new(tuned_config()).unwrap();
    let fitted = model.fit_prices(&history).unwrap();
    let result = fitted.predict(365).unwrap();
    assert_well_formed(&result);

    let names: Vec<&str> = result.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["trend", "weekly", "holidays"]);
    for component in &result.components[1..] {
        assert_eq!(component.mode, SeasonalityMode::Multiplicative);
    }

    let labels: Vec<&str> = fitted
        .holiday_columns()
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert!(labels.contains(&"Earning releases"));
    assert!(fitted
        .holiday_columns()
        .iter()
        .any(|c| c.label == "Earning releases" && c.offset == -14));

    for row in &result.rows {
        let combined = row.trend * (1.0 + row.multiplicative_terms) + row.additive_terms;
        assert!((row.yhat - combined).abs() < 1e-6);
    }
}

#[test]
fn e2e_decompose_future_trading_days() {
    let history = closes_2024();
    let fitted = RegressionForecaster::new(tuned_config())
        .unwrap()
        .fit_prices(&history)
        .unwrap();
    let days = us_business_days(d(2025, 1, 1), d(2025, 3, 31)).unwrap();
    let decomposition = fitted.decompose(&days).unwrap();

    assert_eq!(decomposition.dates, days);
    for component in &decomposition.components {
        assert_eq!(component.values.len(), days.len());
        assert!(component.values.iter().all(|v| v.is_finite()));
    }

    let predicted = fitted.predict_dates(&days).unwrap();
    assert!(predicted.rows.iter().all(|r| r.is_forecast));
    assert_eq!(
        predicted.component("trend").unwrap().values,
        decomposition.component("trend").unwrap().values
    );
}

#[test]
fn e2e_forecast_serializes_as_flat_records() {
    let history = closes_2024();
    let fitted = RegressionForecaster::default().fit_prices(&history).unwrap();
    let result = fitted.predict(5).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), result.len());
    let last = rows.last().unwrap();
    assert_eq!(
        last["date"],
        (fitted.last_date() + Duration::days(5)).to_string()
    );
    assert_eq!(last["is_forecast"], true);
    for key in ["yhat", "yhat_lower", "yhat_upper", "trend"] {
        assert!(last[key].is_number());
    }

    let back: ForecastResult = serde_json::from_value(json).unwrap();
    assert_eq!(back.rows.len(), result.rows.len());
}

#[test]
fn e2e_refit_is_deterministic() {
    let history = closes_2024();
    let model = RegressionForecaster::new(tuned_config()).unwrap();
    let a = model.fit_prices(&history).unwrap().predict(30).unwrap();
    let b = model.fit_prices(&history).unwrap().predict(30).unwrap();
    assert_eq!(a, b);
}
