//! Ridge regression via Gauss-Jordan elimination.

use forecast_spi::{ForecastError, Result};

/// Smallest diagonal penalty applied to any coefficient.
pub const MIN_PENALTY: f64 = 1e-8;

const PIVOT_EPSILON: f64 = 1e-12;

/// Solve `(X'X + diag(penalties)) b = X'y` for `b`.
///
/// `rows` are the rows of the design matrix `X`. Each penalty is floored at
/// [`MIN_PENALTY`] so the system stays positive definite.
pub fn ridge_solve(rows: &[Vec<f64>], target: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let p = penalties.len();
    if p == 0 {
        return Ok(Vec::new());
    }
    if rows.len() != target.len() {
        return Err(ForecastError::Numerical(format!(
            "design has {} rows but target has {} values",
            rows.len(),
            target.len()
        )));
    }

    let mut gram = vec![0.0; p * p];
    let mut rhs = vec![0.0; p];
    for (row, &y) in rows.iter().zip(target) {
        if row.len() != p {
            return Err(ForecastError::Numerical(format!(
                "design row has {} columns, expected {p}",
                row.len()
            )));
        }
        for i in 0..p {
            if row[i] == 0.0 {
                continue;
            }
            rhs[i] += row[i] * y;
            for j in i..p {
                gram[i * p + j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            gram[i * p + j] = gram[j * p + i];
        }
        gram[i * p + i] += penalties[i].max(MIN_PENALTY);
    }

    solve_system(gram, rhs, p)
}

/// Solve the dense system `a x = b` (row-major `a`) with partial pivoting.
pub fn solve_system(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Result<Vec<f64>> {
    for i in 0..n {
        // Find pivot
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k * n + i].abs() > a[max_row * n + i].abs() {
                max_row = k;
            }
        }

        if max_row != i {
            for j in 0..n {
                a.swap(i * n + j, max_row * n + j);
            }
            b.swap(i, max_row);
        }

        let pivot = a[i * n + i];
        if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON {
            return Err(ForecastError::Numerical(format!(
                "singular system at column {i} (pivot {pivot:e})"
            )));
        }

        // Scale row
        for j in 0..n {
            a[i * n + j] /= pivot;
        }
        b[i] /= pivot;

        // Eliminate column
        for k in 0..n {
            if k != i {
                let factor = a[k * n + i];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    a[k * n + j] -= factor * a[i * n + j];
                }
                b[k] -= factor * b[i];
            }
        }
    }

    if b.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::Numerical(
            "solution contains non-finite values".to_string(),
        ));
    }
    Ok(b)
}
