//! Signal generator trait.

use crate::error::Result;
use crate::model::{PriceSeries, Signal, SignalSeries};

/// Produces per-row trading signals from a price series.
pub trait SignalGenerator: Send + Sync {
    /// Generate a signal frame aligned with `prices`.
    fn generate(&self, prices: &PriceSeries) -> Result<SignalSeries>;

    /// Signal in effect on the last observation.
    fn latest(&self, prices: &PriceSeries) -> Result<Signal> {
        Ok(self.generate(prices)?.latest().unwrap_or(Signal::Hold))
    }
}
