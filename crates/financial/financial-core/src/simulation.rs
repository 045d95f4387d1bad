//! Geometric Brownian motion Monte Carlo.

use chrono::NaiveDate;
use financial_spi::{
    FinancialError, Frequency, GbmCalibration, PathSimulator, PriceSeries, Result, ReturnKind,
    ReturnSeries, SimulatedPath, SimulatedPoint, TerminalDistribution,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;

use crate::returns::build_returns;
use crate::stats::{mean, percentile_sorted, population_std, sample_variance};

/// Draws per parallel chunk of the terminal distribution.
const CHUNK_SIZE: usize = 4096;

/// Estimate GBM parameters from daily log returns.
pub fn calibrate(log_returns: &[f64]) -> Result<GbmCalibration> {
    if log_returns.len() < 2 {
        return Err(FinancialError::InsufficientData {
            required: 2,
            got: log_returns.len(),
        });
    }
    if log_returns.iter().any(|r| !r.is_finite()) {
        return Err(FinancialError::Numerical(
            "log returns contain non-finite values".to_string(),
        ));
    }

    let mean = mean(log_returns);
    let variance = sample_variance(log_returns);
    Ok(GbmCalibration {
        mean,
        std: variance.sqrt(),
        variance,
        drift: mean - variance / 2.0,
        observations: log_returns.len(),
    })
}

/// Calibrate from a log return series.
pub fn calibrate_returns(returns: &ReturnSeries) -> Result<GbmCalibration> {
    if returns.kind() != ReturnKind::Log {
        return Err(FinancialError::invalid(
            "kind",
            "GBM calibration requires log returns",
        ));
    }
    calibrate(&returns.values())
}

/// Calibrate from daily closing prices.
pub fn calibrate_prices(prices: &PriceSeries) -> Result<GbmCalibration> {
    let returns = build_returns(prices, Frequency::Daily, ReturnKind::Log)?;
    calibrate_returns(&returns)
}

/// Simulate one price path over `dates`.
///
/// The first point carries `start_price`; each later point applies
/// `exp(drift + std * Z)` with a fresh standard normal draw from `rng`.
pub fn simulate_path<R: Rng + ?Sized>(
    calibration: &GbmCalibration,
    start_price: f64,
    dates: &[NaiveDate],
    rng: &mut R,
) -> Result<SimulatedPath> {
    validate_start_price(start_price)?;
    if dates.is_empty() {
        return Err(FinancialError::invalid("dates", "at least one date is required"));
    }
    if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
        return Err(FinancialError::invalid(
            "dates",
            format!(
                "dates must be strictly increasing ({} follows {})",
                pair[1], pair[0]
            ),
        ));
    }

    let mut points = Vec::with_capacity(dates.len());
    let mut price = start_price;
    points.push(SimulatedPoint {
        date: dates[0],
        price,
    });
    for &date in &dates[1..] {
        let z: f64 = rng.sample(StandardNormal);
        price *= (calibration.drift + calibration.std * z).exp();
        points.push(SimulatedPoint { date, price });
    }
    Ok(SimulatedPath { points })
}

/// Simulate terminal returns after `horizon_steps` periods.
///
/// Each draw is `P0 * exp(drift * h + std * sqrt(h) * Z)`. Draws are split
/// into fixed-size chunks whose seeds come from `rng` in order, so the
/// result depends only on the caller's generator and not on thread
/// scheduling.
pub fn terminal_distribution<R: Rng + ?Sized>(
    calibration: &GbmCalibration,
    start_price: f64,
    simulations: usize,
    horizon_steps: usize,
    rng: &mut R,
) -> Result<TerminalDistribution> {
    validate_start_price(start_price)?;
    if simulations == 0 {
        return Err(FinancialError::invalid("simulations", "must be at least 1"));
    }
    if horizon_steps == 0 {
        return Err(FinancialError::invalid("horizon_steps", "must be at least 1"));
    }

    let h = horizon_steps as f64;
    let drift = calibration.drift * h;
    let scale = calibration.std * h.sqrt();

    let chunk_count = simulations.div_ceil(CHUNK_SIZE);
    let seeds: Vec<u64> = (0..chunk_count).map(|_| rng.gen()).collect();

    let chunks: Vec<Vec<f64>> = seeds
        .par_iter()
        .enumerate()
        .map(|(chunk, &seed)| {
            let len = CHUNK_SIZE.min(simulations - chunk * CHUNK_SIZE);
            let mut local = StdRng::seed_from_u64(seed);
            (0..len)
                .map(|_| {
                    let z: f64 = local.sample(StandardNormal);
                    let terminal = start_price * (drift + scale * z).exp();
                    (terminal - start_price) / start_price
                })
                .collect()
        })
        .collect();
    let returns: Vec<f64> = chunks.into_iter().flatten().collect();

    let mut sorted = returns.clone();
    sorted.sort_by(f64::total_cmp);

    let distribution = TerminalDistribution {
        start_price,
        horizon_steps,
        simulations,
        mean_return: mean(&returns),
        std_return: population_std(&returns),
        percentile_5: percentile_sorted(&sorted, 0.05),
        median: percentile_sorted(&sorted, 0.5),
        percentile_95: percentile_sorted(&sorted, 0.95),
        returns,
    };
    tracing::info!(
        simulations,
        horizon_steps,
        mean_return = distribution.mean_return,
        std_return = distribution.std_return,
        "simulated terminal distribution"
    );
    Ok(distribution)
}

fn validate_start_price(start_price: f64) -> Result<()> {
    if !(start_price.is_finite() && start_price > 0.0) {
        return Err(FinancialError::invalid(
            "start_price",
            format!("must be positive and finite, got {start_price}"),
        ));
    }
    Ok(())
}

/// Convenience constructor for a seeded generator.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// GBM simulator bound to a calibration.
#[derive(Debug, Clone)]
pub struct GbmSimulator {
    calibration: GbmCalibration,
}

impl GbmSimulator {
    pub fn new(calibration: GbmCalibration) -> Self {
        Self { calibration }
    }

    /// Calibrate from daily closing prices.
    pub fn from_prices(prices: &PriceSeries) -> Result<Self> {
        Ok(Self::new(calibrate_prices(prices)?))
    }

    pub fn calibration(&self) -> &GbmCalibration {
        &self.calibration
    }
}

impl PathSimulator for GbmSimulator {
    fn simulate_path(
        &self,
        start_price: f64,
        dates: &[NaiveDate],
        rng: &mut dyn RngCore,
    ) -> Result<SimulatedPath> {
        simulate_path(&self.calibration, start_price, dates, rng)
    }

    fn terminal_distribution(
        &self,
        start_price: f64,
        simulations: usize,
        horizon_steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<TerminalDistribution> {
        terminal_distribution(
            &self.calibration,
            start_price,
            simulations,
            horizon_steps,
            rng,
        )
    }
}
