//! CAPM risk estimate model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of a CAPM estimation over aligned asset and market returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEstimate {
    /// Sensitivity of asset returns to market returns.
    pub beta: f64,
    /// Annual risk-free rate used in the estimate.
    pub risk_free_rate: f64,
    /// Mean market return per period, annualized.
    pub annualized_market_return: f64,
    /// `rf + beta * (market - rf)`.
    pub expected_return: f64,
    /// Number of aligned return pairs.
    pub observations: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl RiskEstimate {
    /// Market premium over the risk-free rate.
    pub fn market_premium(&self) -> f64 {
        self.annualized_market_return - self.risk_free_rate
    }
}
