//! Trading signal model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Convert to numeric signal: Buy = 1, Sell = -1, Hold = 0.
    pub fn to_numeric(&self) -> f64 {
        match self {
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
            Signal::Hold => 0.0,
        }
    }

    /// Signal implied by a change in position state.
    pub fn from_position_change(change: i8) -> Self {
        match change {
            c if c > 0 => Signal::Buy,
            c if c < 0 => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}

/// One row of a moving-average crossover frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Short simple moving average, `None` until the window fills.
    pub short_ma: Option<f64>,
    /// Long exponential moving average, defined from the first row.
    pub long_ma: f64,
    /// 1 while the short average is above the long average, else 0.
    pub signal: u8,
    /// Change in `signal` from the previous row; `None` on the first row.
    pub position_change: Option<i8>,
}

/// A buy or sell crossover event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
}

/// Crossover signals aligned with the input prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub short_window: usize,
    pub long_window: usize,
    pub rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Buy and sell events in date order.
    pub fn events(&self) -> Vec<CrossoverEvent> {
        self.rows
            .iter()
            .filter_map(|row| match row.position_change {
                Some(change) if change != 0 => Some(CrossoverEvent {
                    date: row.date,
                    price: row.close,
                    signal: Signal::from_position_change(change),
                }),
                _ => None,
            })
            .collect()
    }

    /// Signal in effect on the last row.
    pub fn latest(&self) -> Option<Signal> {
        self.rows.last().map(|row| {
            if row.signal == 1 {
                Signal::Buy
            } else {
                Signal::Sell
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, signal: u8, change: Option<i8>) -> SignalRow {
        SignalRow {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            close: 10.0 + day as f64,
            short_ma: Some(1.0),
            long_ma: 1.0,
            signal,
            position_change: change,
        }
    }

    #[test]
    fn test_signal_to_numeric() {
        assert_eq!(Signal::Buy.to_numeric(), 1.0);
        assert_eq!(Signal::Sell.to_numeric(), -1.0);
        assert_eq!(Signal::Hold.to_numeric(), 0.0);
    }

    #[test]
    fn test_from_position_change() {
        assert_eq!(Signal::from_position_change(1), Signal::Buy);
        assert_eq!(Signal::from_position_change(-1), Signal::Sell);
        assert_eq!(Signal::from_position_change(0), Signal::Hold);
    }

    #[test]
    fn test_events_skip_unchanged_rows() {
        let series = SignalSeries {
            short_window: 2,
            long_window: 3,
            rows: vec![
                row(1, 0, None),
                row(2, 1, Some(1)),
                row(3, 1, Some(0)),
                row(4, 0, Some(-1)),
            ],
        };
        let events = series.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].signal, Signal::Buy);
        assert_eq!(events[0].price, 12.0);
        assert_eq!(events[1].signal, Signal::Sell);
        assert_eq!(series.latest(), Some(Signal::Sell));
    }
}
