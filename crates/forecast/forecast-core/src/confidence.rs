//! Uncertainty intervals for forecasts
//!
//! Bounds are `yhat +/- z * se` where `z` is the normal quantile for the
//! interval width and `se` grows with distance past the training data.

use forecast_spi::{ForecastError, Result};

/// Inverse of the standard normal CDF (Acklam's rational approximation).
///
/// Relative error is below 1.2e-9 over `(0, 1)`.
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ForecastError::invalid(
            "probability",
            format!("must be in (0, 1), got {p}"),
        ));
    }

    const A: [f64; 6] = [
        -3.969683028665376e1,
        2.209460984245205e2,
        -2.759285104469687e2,
        1.383577518672690e2,
        -3.066479806614716e1,
        2.506628277459239e0,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e1,
        1.615858368580409e2,
        -1.556989798598866e2,
        6.680131188771972e1,
        -1.328068155288572e1,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-3,
        -3.223964580411365e-1,
        -2.400758277161838e0,
        -2.549732539343734e0,
        4.374664141464968e0,
        2.938163982698783e0,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-3,
        3.224671290700398e-1,
        2.445134137142996e0,
        3.754408661907416e0,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    };
    Ok(x)
}

/// Two-sided z-score for a central interval of the given width.
pub fn z_score(interval_width: f64) -> Result<f64> {
    if !(interval_width > 0.0 && interval_width < 1.0) {
        return Err(ForecastError::invalid(
            "interval_width",
            format!("must be in (0, 1), got {interval_width}"),
        ));
    }
    normal_quantile(0.5 + interval_width / 2.0)
}

/// Variance of accumulated trend changes `dt` scaled time units past the
/// training data.
///
/// Changes arrive at `rate` per unit time with mean absolute size
/// `mean_abs_delta`, giving `2 rate b^2 dt^3 / 3`.
pub fn trend_variance(rate: f64, mean_abs_delta: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    2.0 * rate * mean_abs_delta.powi(2) * dt.powi(3) / 3.0
}

/// Lower and upper bounds from point forecasts and standard errors.
pub fn bounds_from_standard_errors(
    forecast: &[f64],
    std_errors: &[f64],
    interval_width: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let z = z_score(interval_width)?;
    let lower = forecast
        .iter()
        .zip(std_errors)
        .map(|(&f, &se)| f - z * se)
        .collect();
    let upper = forecast
        .iter()
        .zip(std_errors)
        .map(|(&f, &se)| f + z * se)
        .collect();
    Ok((lower, upper))
}
