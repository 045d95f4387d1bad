//! Basic example demonstrating equity analytics
//!
//! Run with: cargo run --example basic -p financial

use chrono::{Duration, NaiveDate};
use financial::simulation::{calibrate_prices, seeded_rng, simulate_path, terminal_distribution};
use financial::{
    rolling_bands, build_returns, crossover_signal, estimate_capm, us_business_days,
    Frequency, PriceSeries, ReturnKind, DEFAULT_RISK_FREE_RATE,
};

fn synthetic(start: NaiveDate, n: usize, base: f64, amplitude: f64) -> PriceSeries {
    let dates: Vec<NaiveDate> = (0..n).map(|i| start + Duration::days(i as i64)).collect();
    let closes: Vec<f64> = (0..n)
        .map(|i| base + amplitude * (i as f64 / 25.0).sin() + i as f64 * 0.05)
        .collect();
    PriceSeries::from_parts(&dates, &closes).expect("synthetic prices are valid")
}

fn main() {
    println!("=== Equity Analytics Basic Examples ===\n");

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
    let asset = synthetic(start, 730, 120.0, 15.0);
    let market = synthetic(start, 730, 4500.0, 150.0);

    // 1. CAPM on month-end returns
    let asset_returns = build_returns(&asset, Frequency::Monthly, ReturnKind::Simple).expect("returns");
    let market_returns = build_returns(&market, Frequency::Monthly, ReturnKind::Simple).expect("returns");
    let capm = estimate_capm(&asset_returns, &market_returns, DEFAULT_RISK_FREE_RATE, 12.0)
        .expect("capm");
    println!("1. CAPM");
    println!("   Beta: {:.4}", capm.beta);
    println!("   Annualized market return: {:.2}%", capm.annualized_market_return * 100.0);
    println!("   Expected return: {:.2}%\n", capm.expected_return * 100.0);

    // 2. Bollinger bands
    let bands = rolling_bands(&asset, 30, 2.0).expect("bands");
    if let Some(last) = bands.rows.last() {
        println!("2. Bollinger Bands (30, 2)");
        println!(
            "   {}: close {:.2}, lower {:.2}, upper {:.2}\n",
            last.date,
            last.close,
            last.lower_band.unwrap_or(f64::NAN),
            last.upper_band.unwrap_or(f64::NAN)
        );
    }

    // 3. Crossover signals
    let signals = crossover_signal(&asset, 30, 90).expect("signals");
    println!("3. SMA(30)/EMA(90) crossover events");
    for event in signals.events().iter().take(5) {
        println!("   {} {:?} at {:.2}", event.date, event.signal, event.price);
    }

    // 4. GBM Monte Carlo
    let calibration = calibrate_prices(&asset).expect("calibration");
    let start_price = asset.last().map(|p| p.price).unwrap_or(1.0);
    let days = us_business_days(
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
    )
    .expect("business days");
    let path = simulate_path(&calibration, start_price, &days, &mut seeded_rng(42)).expect("path");
    println!("\n4. GBM path over {} business days", path.len());
    println!("   Terminal price: {:.2}", path.terminal_price().unwrap_or(f64::NAN));

    let dist = terminal_distribution(&calibration, start_price, 10_000, 1, &mut seeded_rng(42))
        .expect("distribution");
    println!("   One-day mean return: {:.4}%", dist.mean_return * 100.0);
    println!("   One-day std return: {:.4}%", dist.std_return * 100.0);
    println!("   5%/95%: {:.4}% / {:.4}%", dist.percentile_5 * 100.0, dist.percentile_95 * 100.0);
}
