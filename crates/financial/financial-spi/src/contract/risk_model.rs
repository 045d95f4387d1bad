//! Risk model trait.

use crate::error::Result;
use crate::model::{ReturnSeries, RiskEstimate};

/// Estimates systematic risk of an asset against a market benchmark.
pub trait RiskModel: Send + Sync {
    /// Estimate from asset and market returns of the same frequency.
    fn estimate(&self, asset: &ReturnSeries, market: &ReturnSeries) -> Result<RiskEstimate>;
}
