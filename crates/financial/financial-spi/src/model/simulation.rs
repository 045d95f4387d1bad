//! Geometric Brownian motion models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters estimated from daily log returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmCalibration {
    /// Mean daily log return.
    pub mean: f64,
    /// Sample standard deviation of daily log returns.
    pub std: f64,
    /// Sample variance of daily log returns.
    pub variance: f64,
    /// `mean - variance / 2`.
    pub drift: f64,
    /// Number of returns the estimate is based on.
    pub observations: usize,
}

impl GbmCalibration {
    /// Calibration from known mean and standard deviation.
    pub fn from_moments(mean: f64, std: f64, observations: usize) -> Self {
        let variance = std * std;
        Self {
            mean,
            std,
            variance,
            drift: mean - variance / 2.0,
            observations,
        }
    }
}

/// A simulated price on a business day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// One simulated price path; the first point carries the start price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPath {
    pub points: Vec<SimulatedPoint>,
}

impl SimulatedPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn terminal_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

/// Summary of simulated terminal returns relative to the start price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalDistribution {
    pub start_price: f64,
    pub horizon_steps: usize,
    pub simulations: usize,
    pub mean_return: f64,
    /// Population standard deviation of the simulated returns.
    pub std_return: f64,
    pub percentile_5: f64,
    pub median: f64,
    pub percentile_95: f64,
    /// Simulated returns in draw order.
    pub returns: Vec<f64>,
}
