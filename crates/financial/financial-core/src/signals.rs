//! Trading signals implementation.

use financial_api::CrossoverConfig;
use financial_spi::{FinancialError, PriceSeries, Result, SignalGenerator, SignalRow, SignalSeries};

/// Short SMA over long EMA crossover signal generator.
///
/// The position is long (signal 1) while the short simple moving average
/// is strictly above the long exponential moving average.
#[derive(Debug, Clone)]
pub struct SmaEmaCrossover {
    short_window: usize,
    long_window: usize,
}

impl SmaEmaCrossover {
    /// Create a new crossover signal generator.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self> {
        Self::from_config(&CrossoverConfig::new(short_window, long_window))
    }

    pub fn from_config(config: &CrossoverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            short_window: config.short_window,
            long_window: config.long_window,
        })
    }
}

impl SignalGenerator for SmaEmaCrossover {
    fn generate(&self, prices: &PriceSeries) -> Result<SignalSeries> {
        if prices.len() < self.long_window {
            return Err(FinancialError::InsufficientData {
                required: self.long_window,
                got: prices.len(),
            });
        }

        let closes = prices.prices();
        let short = sma(&closes, self.short_window);
        let long = ema(&closes, self.long_window);

        let mut rows: Vec<SignalRow> = Vec::with_capacity(closes.len());
        for (i, point) in prices.points().iter().enumerate() {
            let signal = match short[i] {
                Some(s) if s > long[i] => 1u8,
                _ => 0u8,
            };
            let position_change = rows
                .last()
                .map(|prev| signal as i8 - prev.signal as i8);
            rows.push(SignalRow {
                date: point.date,
                close: point.price,
                short_ma: short[i],
                long_ma: long[i],
                signal,
                position_change,
            });
        }

        tracing::debug!(
            rows = rows.len(),
            short_window = self.short_window,
            long_window = self.long_window,
            "generated crossover signals"
        );

        Ok(SignalSeries {
            short_window: self.short_window,
            long_window: self.long_window,
            rows,
        })
    }
}

/// Compute crossover signals for a short SMA window and a long EMA span.
pub fn crossover_signal(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<SignalSeries> {
    SmaEmaCrossover::new(short_window, long_window)?.generate(prices)
}

/// Simple moving average; `None` until `period` values are available.
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..data.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                None
            } else {
                let window = &data[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

/// Exponential moving average with `alpha = 2 / (span + 1)`.
///
/// Seeded with the first value and defined on every row.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(data.len());
    let mut prev: Option<f64> = None;
    for &value in data {
        let next = match prev {
            Some(p) => alpha * value + (1.0 - alpha) * p,
            None => value,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}
