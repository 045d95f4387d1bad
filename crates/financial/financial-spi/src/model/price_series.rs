//! Dated price series model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FinancialError, Result};

/// A single dated closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Closing prices with strictly increasing dates and positive, finite values.
///
/// Construction validates both invariants, including when deserializing,
/// so every `PriceSeries` in the system can be trusted by downstream
/// calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points that are already in date order.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for point in &points {
            validate_price(point)?;
        }
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(FinancialError::invalid(
                "date",
                format!(
                    "dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                ),
            ));
        }
        Ok(Self { points })
    }

    /// Build a series from points in any order.
    ///
    /// Points are sorted by date; when a date repeats, the last occurrence wins.
    pub fn from_unordered(points: Vec<PricePoint>) -> Result<Self> {
        let mut indexed: Vec<(usize, PricePoint)> = points.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| a.1.date.cmp(&b.1.date).then(a.0.cmp(&b.0)));

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(indexed.len());
        for (_, point) in indexed {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self::new(deduped)
    }

    /// Build a series from parallel date and price slices.
    pub fn from_parts(dates: &[NaiveDate], prices: &[f64]) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(FinancialError::invalid(
                "prices",
                format!("{} dates but {} prices", dates.len(), prices.len()),
            ));
        }
        let points = dates
            .iter()
            .zip(prices)
            .map(|(&date, &price)| PricePoint::new(date, price))
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Price observed on `date`, if any.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.date.cmp(&date))
            .ok()
            .map(|i| self.points[i].price)
    }

    /// Sub-series with dates in `[start, end]`, both ends inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let points = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();
        PriceSeries { points }
    }
}

fn validate_price(point: &PricePoint) -> Result<()> {
    if !point.price.is_finite() || point.price <= 0.0 {
        return Err(FinancialError::invalid(
            "price",
            format!(
                "price on {} must be positive and finite, got {}",
                point.date, point.price
            ),
        ));
    }
    Ok(())
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = FinancialError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        PriceSeries::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
