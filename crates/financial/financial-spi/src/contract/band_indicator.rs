//! Band indicator trait.

use crate::error::Result;
use crate::model::{BollingerFrame, PriceSeries};

/// Computes volatility bands around a moving average.
pub trait BandIndicator: Send + Sync {
    fn bands(&self, prices: &PriceSeries) -> Result<BollingerFrame>;
}
