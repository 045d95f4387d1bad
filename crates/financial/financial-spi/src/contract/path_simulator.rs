//! Price path simulator trait.

use chrono::NaiveDate;
use rand::RngCore;

use crate::error::Result;
use crate::model::{SimulatedPath, TerminalDistribution};

/// Stochastic price simulator.
///
/// Randomness is always supplied by the caller so that a seeded generator
/// reproduces the same output.
pub trait PathSimulator: Send + Sync {
    /// Simulate one path starting at `start_price` on `dates[0]`.
    fn simulate_path(
        &self,
        start_price: f64,
        dates: &[NaiveDate],
        rng: &mut dyn RngCore,
    ) -> Result<SimulatedPath>;

    /// Simulate terminal returns after `horizon_steps` periods.
    fn terminal_distribution(
        &self,
        start_price: f64,
        simulations: usize,
        horizon_steps: usize,
        rng: &mut dyn RngCore,
    ) -> Result<TerminalDistribution>;
}
