//! Financial configuration types.

use financial_spi::{FinancialError, Frequency, Result, ReturnKind};
use serde::{Deserialize, Serialize};

/// Annual risk-free rate used when no observed rate is available.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.0417;

// ============================================================================
// Risk Configuration
// ============================================================================

/// CAPM configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Annual risk-free rate.
    pub risk_free_rate: f64,
    /// Frequency the returns are sampled at.
    pub frequency: Frequency,
    /// Return definition.
    pub return_kind: ReturnKind,
    /// Annualization factor (252 for daily, 12 for monthly).
    pub periods_per_year: f64,
}

impl RiskConfig {
    pub fn new(risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..Self::monthly()
        }
    }

    pub fn daily() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            frequency: Frequency::Daily,
            return_kind: ReturnKind::Simple,
            periods_per_year: Frequency::Daily.periods_per_year(),
        }
    }

    pub fn monthly() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            frequency: Frequency::Monthly,
            return_kind: ReturnKind::Simple,
            periods_per_year: Frequency::Monthly.periods_per_year(),
        }
    }

    /// Use an observed risk-free rate, falling back to the default.
    ///
    /// A missing or non-finite observation is logged and replaced by
    /// [`DEFAULT_RISK_FREE_RATE`].
    pub fn with_observed_rate(mut self, observed: Option<f64>) -> Self {
        self.risk_free_rate = match observed {
            Some(rate) if rate.is_finite() => rate,
            Some(rate) => {
                tracing::warn!(
                    observed = rate,
                    fallback = DEFAULT_RISK_FREE_RATE,
                    "risk-free rate is not finite, using fallback"
                );
                DEFAULT_RISK_FREE_RATE
            }
            None => {
                tracing::warn!(
                    fallback = DEFAULT_RISK_FREE_RATE,
                    "risk-free rate unavailable, using fallback"
                );
                DEFAULT_RISK_FREE_RATE
            }
        };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(FinancialError::invalid(
                "risk_free_rate",
                "must be finite",
            ));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(FinancialError::invalid(
                "periods_per_year",
                format!("must be positive, got {}", self.periods_per_year),
            ));
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self::monthly()
    }
}

// ============================================================================
// Indicator Configuration
// ============================================================================

/// Bollinger band configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    /// Rolling window length.
    pub window: usize,
    /// Number of standard deviations for the bands.
    pub num_std_dev: f64,
}

impl BollingerConfig {
    pub fn new(window: usize, num_std_dev: f64) -> Self {
        Self {
            window,
            num_std_dev,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(FinancialError::invalid(
                "window",
                format!("must be at least 2, got {}", self.window),
            ));
        }
        if !(self.num_std_dev.is_finite() && self.num_std_dev >= 0.0) {
            return Err(FinancialError::invalid(
                "num_std_dev",
                format!("must be finite and non-negative, got {}", self.num_std_dev),
            ));
        }
        Ok(())
    }
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            window: 30,
            num_std_dev: 2.0,
        }
    }
}

/// SMA/EMA crossover configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Simple moving average window.
    pub short_window: usize,
    /// Exponential moving average span.
    pub long_window: usize,
}

impl CrossoverConfig {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 {
            return Err(FinancialError::invalid(
                "short_window",
                "must be at least 1",
            ));
        }
        if self.short_window >= self.long_window {
            return Err(FinancialError::invalid(
                "short_window",
                format!(
                    "must be less than long_window ({} >= {})",
                    self.short_window, self.long_window
                ),
            ));
        }
        Ok(())
    }
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 30,
            long_window: 90,
        }
    }
}

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Monte Carlo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the random generator.
    pub seed: u64,
    /// Number of terminal draws.
    pub simulations: usize,
    /// Number of periods between start and terminal price.
    pub horizon_steps: usize,
}

impl SimulationConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(FinancialError::invalid("simulations", "must be at least 1"));
        }
        if self.horizon_steps == 0 {
            return Err(FinancialError::invalid(
                "horizon_steps",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            simulations: 10_000,
            horizon_steps: 1,
        }
    }
}
