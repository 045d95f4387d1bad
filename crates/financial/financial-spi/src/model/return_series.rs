//! Periodic return series model.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FinancialError, Result};

/// Sampling frequency of a return series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One return per observed trading day.
    Daily,
    /// One return per calendar month, sampled at month end.
    Monthly,
}

impl Frequency {
    /// Conventional number of periods per year.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Frequency::Daily => 252.0,
            Frequency::Monthly => 12.0,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = FinancialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Frequency::Daily),
            "monthly" | "m" => Ok(Frequency::Monthly),
            other => Err(FinancialError::invalid(
                "frequency",
                format!("unknown frequency '{other}', expected daily or monthly"),
            )),
        }
    }
}

/// How a return is computed from two consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    /// `p_t / p_{t-1} - 1`
    Simple,
    /// `ln(p_t / p_{t-1})`
    Log,
}

impl ReturnKind {
    /// Return from `previous` to `current`.
    pub fn compute(&self, previous: f64, current: f64) -> f64 {
        match self {
            ReturnKind::Simple => current / previous - 1.0,
            ReturnKind::Log => (current / previous).ln(),
        }
    }
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnKind::Simple => write!(f, "simple"),
            ReturnKind::Log => write!(f, "log"),
        }
    }
}

impl FromStr for ReturnKind {
    type Err = FinancialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "pct" => Ok(ReturnKind::Simple),
            "log" => Ok(ReturnKind::Log),
            other => Err(FinancialError::invalid(
                "kind",
                format!("unknown return kind '{other}', expected simple or log"),
            )),
        }
    }
}

/// A return attributed to the later of its two price dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Finite returns with strictly increasing dates.
///
/// Deserializing goes through [`ReturnSeries::new`], so the invariants hold
/// for every instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReturnSeriesRecord", into = "ReturnSeriesRecord")]
pub struct ReturnSeries {
    frequency: Frequency,
    kind: ReturnKind,
    points: Vec<ReturnPoint>,
}

/// Unvalidated wire form of [`ReturnSeries`].
#[derive(Clone, Serialize, Deserialize)]
struct ReturnSeriesRecord {
    frequency: Frequency,
    kind: ReturnKind,
    points: Vec<ReturnPoint>,
}

impl TryFrom<ReturnSeriesRecord> for ReturnSeries {
    type Error = FinancialError;

    fn try_from(record: ReturnSeriesRecord) -> Result<Self> {
        ReturnSeries::new(record.frequency, record.kind, record.points)
    }
}

impl From<ReturnSeries> for ReturnSeriesRecord {
    fn from(series: ReturnSeries) -> Self {
        Self {
            frequency: series.frequency,
            kind: series.kind,
            points: series.points,
        }
    }
}

impl ReturnSeries {
    pub fn new(frequency: Frequency, kind: ReturnKind, points: Vec<ReturnPoint>) -> Result<Self> {
        if let Some(point) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(FinancialError::Numerical(format!(
                "non-finite return on {}",
                point.date
            )));
        }
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(FinancialError::invalid(
                "date",
                format!(
                    "return dates must be strictly increasing ({} follows {})",
                    pair[1].date, pair[0].date
                ),
            ));
        }
        Ok(Self {
            frequency,
            kind,
            points,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Growth of one unit invested at the start, one value per return.
    pub fn cumulative_growth(&self) -> Vec<f64> {
        let mut growth = 1.0;
        self.points
            .iter()
            .map(|p| {
                growth *= match self.kind {
                    ReturnKind::Simple => 1.0 + p.value,
                    ReturnKind::Log => p.value.exp(),
                };
                growth
            })
            .collect()
    }
}
