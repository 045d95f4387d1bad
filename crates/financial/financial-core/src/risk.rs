//! CAPM risk model implementation.

use financial_api::RiskConfig;
use financial_spi::{FinancialError, Result, ReturnSeries, RiskEstimate, RiskModel};

use crate::returns::{align_returns, MIN_OVERLAP};
use crate::stats::{mean, sample_covariance};

/// Capital asset pricing model over aligned periodic returns.
#[derive(Debug, Clone, PartialEq)]
pub struct CapmModel {
    risk_free_rate: f64,
    periods_per_year: f64,
}

impl CapmModel {
    /// Create a model with an annual risk-free rate and annualization factor.
    pub fn new(risk_free_rate: f64, periods_per_year: f64) -> Result<Self> {
        let config = RiskConfig {
            risk_free_rate,
            periods_per_year,
            ..RiskConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            risk_free_rate: config.risk_free_rate,
            periods_per_year: config.periods_per_year,
        })
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }
}

impl RiskModel for CapmModel {
    fn estimate(&self, asset: &ReturnSeries, market: &ReturnSeries) -> Result<RiskEstimate> {
        estimate_capm(asset, market, self.risk_free_rate, self.periods_per_year)
    }
}

/// Estimate beta and CAPM expected return.
///
/// Returns are inner-joined on date. Beta is the sample covariance of the
/// aligned returns over the sample variance of market returns, and the
/// expected return is `rf + beta * (mean(market) * periods_per_year - rf)`.
pub fn estimate_capm(
    asset: &ReturnSeries,
    market: &ReturnSeries,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Result<RiskEstimate> {
    for series in [asset, market] {
        if series.len() < 2 {
            return Err(FinancialError::InsufficientData {
                required: 2,
                got: series.len(),
            });
        }
    }
    if !(periods_per_year.is_finite() && periods_per_year > 0.0) {
        return Err(FinancialError::invalid(
            "periods_per_year",
            format!("must be positive, got {periods_per_year}"),
        ));
    }
    if !risk_free_rate.is_finite() {
        return Err(FinancialError::invalid("risk_free_rate", "must be finite"));
    }

    let aligned = align_returns(asset, market);
    if aligned.len() < MIN_OVERLAP {
        return Err(FinancialError::MisalignedSeries {
            overlap: aligned.len(),
            required: MIN_OVERLAP,
        });
    }

    let asset_values: Vec<f64> = aligned.iter().map(|&(_, a, _)| a).collect();
    let market_values: Vec<f64> = aligned.iter().map(|&(_, _, m)| m).collect();

    let market_variance = sample_covariance(&market_values, &market_values);
    let constant_market = market_values.windows(2).all(|w| w[0] == w[1]);
    if constant_market || !market_variance.is_finite() || market_variance <= 0.0 {
        return Err(FinancialError::Numerical(
            "market returns have zero variance; beta is undefined".to_string(),
        ));
    }
    let beta = sample_covariance(&asset_values, &market_values) / market_variance;

    let annualized_market_return = mean(&market_values) * periods_per_year;
    let expected_return = risk_free_rate + beta * (annualized_market_return - risk_free_rate);

    let period_start = aligned[0].0;
    let period_end = aligned[aligned.len() - 1].0;
    tracing::debug!(
        beta,
        expected_return,
        observations = aligned.len(),
        "estimated CAPM"
    );

    Ok(RiskEstimate {
        beta,
        risk_free_rate,
        annualized_market_return,
        expected_return,
        observations: aligned.len(),
        period_start,
        period_end,
    })
}
