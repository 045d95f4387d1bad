//! Forecast fitting and prediction benchmarks.
//!
//! Run with: cargo bench -p forecast-core

use std::time::Instant;

use chrono::{Duration, NaiveDate};
use financial_spi::PriceSeries;
use forecast_api::{ForecastConfig, SeasonalityMode};
use forecast_core::{FittedForecast, ForecastModel, HolidayCalendarBuilder, RegressionForecaster};

fn bench<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("{}: {:?} per iteration ({} iterations)", name, per_iter, iterations);
}

fn generate_prices(n: usize) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
    let dates: Vec<NaiveDate> = (0..n).map(|i| start + Duration::days(i as i64)).collect();
    let closes: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + t * 0.05 + (t * std::f64::consts::TAU / 7.0).sin() * 2.0
                + (t * std::f64::consts::TAU / 365.25).cos() * 5.0
        })
        .collect();
    PriceSeries::from_parts(&dates, &closes).unwrap_or_default()
}

fn main() {
    println!("--- Fit ---");
    for &size in &[365, 1_000] {
        let history = generate_prices(size);
        if let Ok(model) = RegressionForecaster::new(ForecastConfig::default()) {
            bench(&format!("fit additive n={}", size), 10, || {
                let _ = model.fit_prices(&history);
            });
        }

        let holidays = HolidayCalendarBuilder::new()
            .with_us_federal(2020..=2023)
            .and_then(|b| b.build());
        if let Ok(holidays) = holidays {
            let config = ForecastConfig::default()
                .with_seasonality_mode(SeasonalityMode::Multiplicative)
                .with_holidays(holidays);
            if let Ok(model) = RegressionForecaster::new(config) {
                bench(&format!("fit multiplicative + holidays n={}", size), 10, || {
                    let _ = model.fit_prices(&history);
                });
            }
        }
    }

    println!("\n--- Predict ---");
    let history = generate_prices(1_000);
    let fitted = RegressionForecaster::new(ForecastConfig::default()).and_then(|m| m.fit_prices(&history));
    if let Ok(fitted) = fitted {
        for &horizon in &[30, 365] {
            bench(&format!("predict horizon={}", horizon), 100, || {
                let _ = fitted.predict(horizon);
            });
        }
    }
}
