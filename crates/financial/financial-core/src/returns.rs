//! Return series construction.

use chrono::{Datelike, Months, NaiveDate};
use financial_spi::{
    FinancialError, Frequency, PricePoint, PriceSeries, Result, ReturnKind, ReturnPoint,
    ReturnSeries,
};

/// Minimum number of shared observations for two aligned series.
pub const MIN_OVERLAP: usize = 2;

/// Build returns from a price series.
///
/// Monthly returns are computed from month-end samples (see
/// [`resample_month_end`]). Each return is dated at the later of its two
/// prices, so the output has one fewer element than the sampled prices.
pub fn build_returns(
    prices: &PriceSeries,
    frequency: Frequency,
    kind: ReturnKind,
) -> Result<ReturnSeries> {
    let sampled = match frequency {
        Frequency::Daily => prices.points().to_vec(),
        Frequency::Monthly => resample_month_end(prices)?,
    };
    if sampled.len() < 2 {
        return Err(FinancialError::InsufficientData {
            required: 2,
            got: sampled.len(),
        });
    }

    let points = sampled
        .windows(2)
        .map(|w| ReturnPoint {
            date: w[1].date,
            value: kind.compute(w[0].price, w[1].price),
        })
        .collect();
    ReturnSeries::new(frequency, kind, points)
}

/// Sample a price series at calendar month ends.
///
/// Every month from the first to the last observation yields one point,
/// dated on the last calendar day of the month and carrying the last price
/// observed on or before that day. Months without observations repeat the
/// previous month's price.
pub fn resample_month_end(prices: &PriceSeries) -> Result<Vec<PricePoint>> {
    let points = prices.points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(Vec::new()),
    };

    let final_month_end = month_end(last.date)?;
    let mut month = month_end(first.date)?;
    let mut idx = 0;
    let mut carried = first.price;
    let mut sampled = Vec::new();

    while month <= final_month_end {
        while idx < points.len() && points[idx].date <= month {
            carried = points[idx].price;
            idx += 1;
        }
        sampled.push(PricePoint::new(month, carried));
        month = next_month_end(month)?;
    }
    Ok(sampled)
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

fn next_month_end(month_end_date: NaiveDate) -> Result<NaiveDate> {
    let next = month_end_date
        .succ_opt()
        .ok_or_else(|| out_of_range(month_end_date))?;
    month_end(next)
}

fn out_of_range(date: NaiveDate) -> FinancialError {
    FinancialError::invalid("date", format!("{date} is outside the supported range"))
}

/// Inner-join two price series on date.
pub fn align_prices(a: &PriceSeries, b: &PriceSeries) -> Result<(PriceSeries, PriceSeries)> {
    let pairs = inner_join(a.points(), b.points(), |p| p.date);
    if pairs.len() < MIN_OVERLAP {
        return Err(FinancialError::MisalignedSeries {
            overlap: pairs.len(),
            required: MIN_OVERLAP,
        });
    }
    let (left, right): (Vec<PricePoint>, Vec<PricePoint>) = pairs.into_iter().unzip();
    Ok((PriceSeries::new(left)?, PriceSeries::new(right)?))
}

/// Inner-join two return series on date, returning paired values and dates.
pub fn align_returns(a: &ReturnSeries, b: &ReturnSeries) -> Vec<(NaiveDate, f64, f64)> {
    inner_join(a.points(), b.points(), |p| p.date)
        .into_iter()
        .map(|(x, y)| (x.date, x.value, y.value))
        .collect()
}

/// Merge join over two slices sorted by strictly increasing keys.
fn inner_join<T: Copy, K: Ord>(a: &[T], b: &[T], key: impl Fn(&T) -> K) -> Vec<(T, T)> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match key(&a[i]).cmp(&key(&b[j])) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push((a[i], b[j]));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(NaiveDate, f64)]) -> PriceSeries {
        PriceSeries::new(points.iter().map(|&(d, p)| PricePoint::new(d, p)).collect()).unwrap()
    }

    #[test]
    fn test_daily_simple_returns() {
        let prices = series(&[
            (d(2024, 1, 2), 100.0),
            (d(2024, 1, 3), 110.0),
            (d(2024, 1, 4), 99.0),
        ]);
        let returns = build_returns(&prices, Frequency::Daily, ReturnKind::Simple).unwrap();
        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates(), vec![d(2024, 1, 3), d(2024, 1, 4)]);
        let values = returns.values();
        assert!((values[0] - 0.10).abs() < 1e-12);
        assert!((values[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_daily_log_returns() {
        let prices = series(&[(d(2024, 1, 2), 100.0), (d(2024, 1, 3), 105.0)]);
        let returns = build_returns(&prices, Frequency::Daily, ReturnKind::Log).unwrap();
        assert!((returns.values()[0] - 1.05f64.ln()).abs() < 1e-12);
        assert_eq!(returns.kind(), ReturnKind::Log);
    }

    #[test]
    fn test_single_price_is_insufficient() {
        let prices = series(&[(d(2024, 1, 2), 100.0)]);
        let result = build_returns(&prices, Frequency::Daily, ReturnKind::Simple);
        assert_eq!(
            result.unwrap_err(),
            FinancialError::InsufficientData { required: 2, got: 1 }
        );
    }

    #[test]
    fn test_month_end_handles_leap_year() {
        assert_eq!(month_end(d(2024, 2, 10)).unwrap(), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 2, 10)).unwrap(), d(2023, 2, 28));
        assert_eq!(month_end(d(2024, 12, 1)).unwrap(), d(2024, 12, 31));
    }

    #[test]
    fn test_resample_forward_fills_empty_months() {
        let prices = series(&[
            (d(2024, 1, 15), 10.0),
            (d(2024, 1, 31), 11.0),
            (d(2024, 3, 5), 12.0),
        ]);
        let sampled = resample_month_end(&prices).unwrap();
        let dates: Vec<_> = sampled.iter().map(|p| p.date).collect();
        let values: Vec<_> = sampled.iter().map(|p| p.price).collect();
        assert_eq!(dates, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]);
        assert_eq!(values, vec![11.0, 11.0, 12.0]);
    }

    #[test]
    fn test_monthly_returns_from_month_ends() {
        let prices = series(&[
            (d(2024, 1, 30), 100.0),
            (d(2024, 2, 28), 120.0),
            (d(2024, 3, 28), 90.0),
        ]);
        let returns = build_returns(&prices, Frequency::Monthly, ReturnKind::Simple).unwrap();
        assert_eq!(returns.dates(), vec![d(2024, 2, 29), d(2024, 3, 31)]);
        let values = returns.values();
        assert!((values[0] - 0.2).abs() < 1e-12);
        assert!((values[1] + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_single_month_is_insufficient() {
        let prices = series(&[(d(2024, 1, 2), 100.0), (d(2024, 1, 3), 101.0)]);
        assert!(matches!(
            build_returns(&prices, Frequency::Monthly, ReturnKind::Simple),
            Err(FinancialError::InsufficientData { required: 2, got: 1 })
        ));
    }

    fn assert_reconstructs(growth: &[f64], sampled: &[f64]) {
        assert_eq!(growth.len(), sampled.len() - 1);
        for (g, p) in growth.iter().zip(&sampled[1..]) {
            let expected = p / sampled[0];
            assert!((g / expected - 1.0).abs() < 1e-9, "{} vs {}", g, expected);
        }
    }

    #[test]
    fn test_cumulative_growth_reconstructs_daily_prices() {
        let points: Vec<(NaiveDate, f64)> = d(2024, 1, 2)
            .iter_days()
            .take(60)
            .enumerate()
            .map(|(i, day)| (day, 50.0 + 8.0 * (i as f64 * 0.4).sin() + 0.1 * i as f64))
            .collect();
        let prices = series(&points);
        for kind in [ReturnKind::Simple, ReturnKind::Log] {
            let returns = build_returns(&prices, Frequency::Daily, kind).unwrap();
            assert_reconstructs(&returns.cumulative_growth(), &prices.prices());
        }
    }

    #[test]
    fn test_cumulative_growth_reconstructs_month_ends() {
        // February and May have no observations and are forward filled
        let prices = series(&[
            (d(2024, 1, 10), 20.0),
            (d(2024, 1, 29), 21.5),
            (d(2024, 3, 4), 19.0),
            (d(2024, 3, 28), 22.0),
            (d(2024, 4, 30), 23.5),
            (d(2024, 6, 3), 18.25),
            (d(2024, 6, 14), 24.0),
        ]);
        let sampled: Vec<f64> = resample_month_end(&prices)
            .unwrap()
            .iter()
            .map(|p| p.price)
            .collect();
        assert_eq!(sampled, vec![21.5, 21.5, 22.0, 23.5, 23.5, 24.0]);
        for kind in [ReturnKind::Simple, ReturnKind::Log] {
            let returns = build_returns(&prices, Frequency::Monthly, kind).unwrap();
            assert_reconstructs(&returns.cumulative_growth(), &sampled);
        }
    }

    #[test]
    fn test_align_prices_inner_join() {
        let a = series(&[
            (d(2024, 1, 2), 1.0),
            (d(2024, 1, 3), 2.0),
            (d(2024, 1, 5), 3.0),
        ]);
        let b = series(&[
            (d(2024, 1, 3), 20.0),
            (d(2024, 1, 4), 30.0),
            (d(2024, 1, 5), 40.0),
        ]);
        let (left, right) = align_prices(&a, &b).unwrap();
        assert_eq!(left.dates(), vec![d(2024, 1, 3), d(2024, 1, 5)]);
        assert_eq!(right.prices(), vec![20.0, 40.0]);
    }

    #[test]
    fn test_align_prices_requires_overlap() {
        let a = series(&[(d(2024, 1, 2), 1.0), (d(2024, 1, 3), 2.0)]);
        let b = series(&[(d(2024, 1, 3), 1.0), (d(2024, 1, 4), 2.0)]);
        assert_eq!(
            align_prices(&a, &b).unwrap_err(),
            FinancialError::MisalignedSeries {
                overlap: 1,
                required: 2
            }
        );
    }
}
