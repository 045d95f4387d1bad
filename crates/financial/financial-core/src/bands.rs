//! Bollinger Bands implementation.

use financial_api::BollingerConfig;
use financial_spi::{BandIndicator, BandRow, BollingerFrame, FinancialError, PriceSeries, Result};

use crate::stats::{mean, sample_variance};

/// Bollinger Bands.
///
/// Volatility indicator consisting of:
/// - Middle band: SMA of price
/// - Upper band: SMA + (sample std * multiplier)
/// - Lower band: SMA - (sample std * multiplier)
#[derive(Debug, Clone)]
pub struct BollingerBands {
    window: usize,
    num_std_dev: f64,
}

impl BollingerBands {
    pub fn new(window: usize, num_std_dev: f64) -> Result<Self> {
        Self::from_config(&BollingerConfig::new(window, num_std_dev))
    }

    pub fn from_config(config: &BollingerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            window: config.window,
            num_std_dev: config.num_std_dev,
        })
    }

    /// Calculate (middle, upper, lower) aligned with `data`.
    ///
    /// The first `window - 1` entries are `None`.
    pub fn calculate(&self, data: &[f64]) -> Vec<Option<(f64, f64, f64)>> {
        let mut out = vec![None; self.window.saturating_sub(1).min(data.len())];
        for i in (self.window - 1)..data.len() {
            let slice = &data[i + 1 - self.window..=i];
            let sma = mean(slice);
            let std = sample_variance(slice).sqrt();
            out.push(Some((
                sma,
                sma + self.num_std_dev * std,
                sma - self.num_std_dev * std,
            )));
        }
        out
    }
}

impl BandIndicator for BollingerBands {
    fn bands(&self, prices: &PriceSeries) -> Result<BollingerFrame> {
        if prices.len() < self.window {
            return Err(FinancialError::InsufficientData {
                required: self.window,
                got: prices.len(),
            });
        }

        let closes = prices.prices();
        let rows = prices
            .points()
            .iter()
            .zip(self.calculate(&closes))
            .map(|(point, band)| BandRow {
                date: point.date,
                close: point.price,
                moving_average: band.map(|b| b.0),
                upper_band: band.map(|b| b.1),
                lower_band: band.map(|b| b.2),
            })
            .collect();

        Ok(BollingerFrame {
            window: self.window,
            num_std_dev: self.num_std_dev,
            rows,
        })
    }
}

/// Compute Bollinger bands with a rolling window and band multiplier.
pub fn rolling_bands(prices: &PriceSeries, window: usize, num_std_dev: f64) -> Result<BollingerFrame> {
    BollingerBands::new(window, num_std_dev)?.bands(prices)
}
