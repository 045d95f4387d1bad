//! Dated observations a forecast model is fitted to.

use chrono::NaiveDate;
use financial_spi::{PriceSeries, ReturnSeries};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// A single `(date, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Finite observations with strictly increasing dates.
///
/// Unlike [`PriceSeries`], values may be zero or negative, so return
/// series can be forecast as well as prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ObservationSeries {
    points: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(points: Vec<Observation>) -> Result<Self> {
        if let Some(point) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::invalid(
                "value",
                format!("observation on {} is not finite", point.date),
            ));
        }
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::invalid(
                "date",
                format!(
                    "dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                ),
            ));
        }
        Ok(Self { points })
    }

    pub fn from_parts(dates: &[NaiveDate], values: &[f64]) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::invalid(
                "values",
                format!("{} dates but {} values", dates.len(), values.len()),
            ));
        }
        Self::new(
            dates
                .iter()
                .zip(values)
                .map(|(&date, &value)| Observation::new(date, value))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

// Both sources already guarantee finite values and increasing dates.
impl From<&PriceSeries> for ObservationSeries {
    fn from(prices: &PriceSeries) -> Self {
        Self {
            points: prices
                .points()
                .iter()
                .map(|p| Observation::new(p.date, p.price))
                .collect(),
        }
    }
}

impl From<&ReturnSeries> for ObservationSeries {
    fn from(returns: &ReturnSeries) -> Self {
        Self {
            points: returns
                .points()
                .iter()
                .map(|p| Observation::new(p.date, p.value))
                .collect(),
        }
    }
}

impl TryFrom<Vec<Observation>> for ObservationSeries {
    type Error = ForecastError;

    fn try_from(points: Vec<Observation>) -> Result<Self> {
        ObservationSeries::new(points)
    }
}

impl From<ObservationSeries> for Vec<Observation> {
    fn from(series: ObservationSeries) -> Self {
        series.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use financial_spi::{Frequency, ReturnKind, ReturnPoint};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_accepts_negative_and_zero_values() {
        let series = ObservationSeries::from_parts(&[d(2), d(3), d(4)], &[0.01, -0.02, 0.0]).unwrap();
        assert_eq!(series.values(), vec![0.01, -0.02, 0.0]);
    }

    #[test]
    fn test_rejects_non_finite_and_unordered() {
        assert!(ObservationSeries::from_parts(&[d(2)], &[f64::NAN]).is_err());
        assert!(ObservationSeries::from_parts(&[d(3), d(2)], &[1.0, 2.0]).is_err());
        assert!(ObservationSeries::from_parts(&[d(2)], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_from_price_and_return_series() {
        let prices = PriceSeries::from_parts(&[d(2), d(3)], &[10.0, 11.0]).unwrap();
        let series = ObservationSeries::from(&prices);
        assert_eq!(series.dates(), prices.dates());
        assert_eq!(series.values(), vec![10.0, 11.0]);

        let returns = ReturnSeries::new(
            Frequency::Daily,
            ReturnKind::Simple,
            vec![ReturnPoint { date: d(3), value: -0.05 }],
        )
        .unwrap();
        assert_eq!(ObservationSeries::from(&returns).values(), vec![-0.05]);
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = r#"[{"date":"2024-01-03","value":1.0},{"date":"2024-01-02","value":2.0}]"#;
        assert!(serde_json::from_str::<ObservationSeries>(bad).is_err());

        let good = r#"[{"date":"2024-01-02","value":-1.0}]"#;
        let series: ObservationSeries = serde_json::from_str(good).unwrap();
        assert_eq!(series.len(), 1);
    }
}
