//! Basic example demonstrating the regression forecast model
//!
//! Run with: cargo run --example basic -p forecast

use chrono::NaiveDate;
use financial::{us_business_days, PriceSeries};
use forecast::{
    CustomSeasonality, FittedForecast, ForecastConfig, ForecastModel, HolidayCalendarBuilder,
    RegressionForecaster, SeasonalityMode, YearlySeasonality,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Forecast Basic Examples ===\n");

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("invalid end date")?;
    let days = us_business_days(start, end)?;
    let closes: Vec<f64> = (0..days.len())
        .map(|i| 100.0 + 0.1 * i as f64 + 5.0 * (i as f64 / 15.0).sin())
        .collect();
    let history = PriceSeries::from_parts(&days, &closes)?;
    println!("History: {} trading days, {} to {}\n", history.len(), start, end);

    // 1. Baseline model
    println!("1. Baseline (linear trend, weekly seasonality)");
    let baseline = RegressionForecaster::new(ForecastConfig::default())?.fit_prices(&history)?;
    let result = baseline.predict(365)?;
    if let Some(last) = result.future().last() {
        println!(
            "   {}: {:.2} [{:.2}, {:.2}]",
            last.date, last.yhat, last.yhat_lower, last.yhat_upper
        );
    }
    println!("   Residual sigma: {:.4}\n", baseline.sigma());

    // 2. Tuned model with market holidays and earnings windows
    println!("2. Multiplicative with holidays and earnings");
    let calendar = HolidayCalendarBuilder::new()
        .with_nyse_closures(2024..=2025)?
        .with_nyse_early_closes(2024..=2025)?
        .with_event(
            "Earning releases",
            &[
                NaiveDate::from_ymd_opt(2024, 4, 25).ok_or("invalid date")?,
                NaiveDate::from_ymd_opt(2024, 7, 30).ok_or("invalid date")?,
                NaiveDate::from_ymd_opt(2024, 10, 31).ok_or("invalid date")?,
            ],
            14,
            28,
        )
        .build()?;
    let config = ForecastConfig::new()
        .with_seasonality_mode(SeasonalityMode::Multiplicative)
        .with_yearly_seasonality(YearlySeasonality::Disabled)
        .with_weekly_seasonality(false)
        .add_seasonality(CustomSeasonality::new("weekly", 7.0, 4).with_prior_scale(0.01))
        .with_holidays(calendar);
    let tuned = RegressionForecaster::new(config)?.fit_prices(&history)?;
    let result = tuned.predict(365)?;
    println!("   Holiday columns: {}", tuned.holiday_columns().len());
    println!("   Iterations: {} (converged: {})", tuned.iterations(), tuned.converged());
    for component in &result.components {
        let last = component.values.last().copied().unwrap_or_default();
        println!("   {:<10} ({}) last value {:.4}", component.name, component.mode, last);
    }

    // 3. Uncertainty widens with the horizon
    println!("\n3. Interval width by horizon");
    for row in result.future().step_by(90) {
        println!("   {}: width {:.2}", row.date, row.yhat_upper - row.yhat_lower);
    }

    Ok(())
}
