//! Bollinger band frame model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a Bollinger band frame.
///
/// The band fields are `None` until a full window of prices is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub date: NaiveDate,
    pub close: f64,
    pub moving_average: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

impl BandRow {
    /// Band width (upper minus lower), when defined.
    pub fn width(&self) -> Option<f64> {
        Some(self.upper_band? - self.lower_band?)
    }
}

/// Bollinger bands aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerFrame {
    pub window: usize,
    pub num_std_dev: f64,
    pub rows: Vec<BandRow>,
}

impl BollingerFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where the bands are defined.
    pub fn defined_rows(&self) -> impl Iterator<Item = &BandRow> {
        self.rows.iter().filter(|r| r.moving_average.is_some())
    }
}
