//! Holiday calendar construction and holiday regression features.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use financial_core::calendar::{nyse_early_closes, nyse_holidays, us_federal_holidays, MarketHoliday};
use forecast_spi::{HolidayCalendar, HolidayEntry, Result, SeasonalityMode};

/// Builds a [`HolidayCalendar`] from jurisdiction holidays, exchange
/// closures and event dates.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendarBuilder {
    entries: Vec<HolidayEntry>,
}

impl HolidayCalendarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add US federal holidays on their observed dates.
    pub fn with_us_federal(self, years: impl IntoIterator<Item = i32>) -> Result<Self> {
        Ok(self.with_market_holidays(us_federal_holidays(years)?))
    }

    /// Add full-day NYSE closures.
    pub fn with_nyse_closures(self, years: impl IntoIterator<Item = i32>) -> Result<Self> {
        Ok(self.with_market_holidays(nyse_holidays(years)?))
    }

    /// Add NYSE early-close sessions.
    pub fn with_nyse_early_closes(self, years: impl IntoIterator<Item = i32>) -> Result<Self> {
        Ok(self.with_market_holidays(nyse_early_closes(years)?))
    }

    fn with_market_holidays(mut self, holidays: Vec<MarketHoliday>) -> Self {
        self.entries.extend(
            holidays
                .into_iter()
                .map(|h| HolidayEntry::new(h.date, h.name)),
        );
        self
    }

    /// Add single-day entries under one label.
    pub fn with_closures(self, label: &str, dates: &[NaiveDate]) -> Self {
        self.with_event(label, dates, 0, 0)
    }

    /// Add entries under one label, each active from `lower_window` days
    /// before to `upper_window` days after its date.
    pub fn with_event(
        mut self,
        label: &str,
        dates: &[NaiveDate],
        lower_window: u32,
        upper_window: u32,
    ) -> Self {
        self.entries.extend(
            dates
                .iter()
                .map(|&date| HolidayEntry::new(date, label).with_window(lower_window, upper_window)),
        );
        self
    }

    pub fn with_entry(mut self, entry: HolidayEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_calendar(mut self, calendar: &HolidayCalendar) -> Self {
        self.entries.extend(calendar.entries().iter().cloned());
        self
    }

    pub fn build(self) -> Result<HolidayCalendar> {
        HolidayCalendar::new(self.entries)
    }
}

/// One holiday indicator column: a label at a day offset from its date.
#[derive(Debug, Clone, PartialEq)]
pub struct HolidayColumn {
    pub label: String,
    pub offset: i64,
    pub prior_scale: f64,
}

/// Indicator features for the `(label, offset)` pairs observed in history.
///
/// Columns of different labels active on the same date all fire, so their
/// effects sum. A label/offset pair appearing twice on one date is a single
/// indicator.
#[derive(Debug, Clone, Default)]
pub struct HolidayFeatures {
    columns: Vec<HolidayColumn>,
    active: HashMap<NaiveDate, Vec<usize>>,
    mode: SeasonalityMode,
}

impl HolidayFeatures {
    pub fn new(
        calendar: &HolidayCalendar,
        default_prior_scale: f64,
        mode: SeasonalityMode,
        history: &[NaiveDate],
    ) -> Self {
        let mut by_date: HashMap<NaiveDate, BTreeSet<(&str, i64)>> = HashMap::new();
        let mut priors: HashMap<&str, f64> = HashMap::new();
        for entry in calendar.entries() {
            priors.insert(
                entry.label.as_str(),
                entry.prior_scale.unwrap_or(default_prior_scale),
            );
            for (offset, date) in entry.active_dates() {
                by_date
                    .entry(date)
                    .or_default()
                    .insert((entry.label.as_str(), offset));
            }
        }

        let observed: BTreeSet<(&str, i64)> = history
            .iter()
            .filter_map(|d| by_date.get(d))
            .flatten()
            .copied()
            .collect();
        let index: HashMap<(&str, i64), usize> = observed
            .iter()
            .enumerate()
            .map(|(i, &key)| (key, i))
            .collect();
        let columns = observed
            .iter()
            .map(|&(label, offset)| HolidayColumn {
                label: label.to_string(),
                offset,
                prior_scale: priors.get(label).copied().unwrap_or(default_prior_scale),
            })
            .collect();

        let active = by_date
            .into_iter()
            .filter_map(|(date, keys)| {
                let cols: Vec<usize> = keys.iter().filter_map(|k| index.get(k).copied()).collect();
                (!cols.is_empty()).then_some((date, cols))
            })
            .collect();

        Self {
            columns,
            active,
            mode,
        }
    }

    pub fn columns(&self) -> &[HolidayColumn] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn mode(&self) -> SeasonalityMode {
        self.mode
    }

    /// Append the indicator row for `date` to `out`.
    pub fn push_features(&self, date: NaiveDate, out: &mut Vec<f64>) {
        let start = out.len();
        out.resize(start + self.columns.len(), 0.0);
        if let Some(cols) = self.active.get(&date) {
            for &c in cols {
                out[start + c] = 1.0;
            }
        }
    }

    pub fn features(&self, date: NaiveDate) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        self.push_features(date, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        start.iter_days().take(n).collect()
    }

    #[test]
    fn test_builder_merges_sources() {
        let calendar = HolidayCalendarBuilder::new()
            .with_nyse_closures([2024])
            .unwrap()
            .with_nyse_early_closes([2024])
            .unwrap()
            .with_event("Earning releases", &[d(2024, 4, 25), d(2024, 7, 30)], 14, 28)
            .build()
            .unwrap();
        assert_eq!(calendar.len(), 10 + 3 + 2);
        assert!(calendar.entries().windows(2).all(|w| w[0].date <= w[1].date));
        let earnings: Vec<_> = calendar
            .entries()
            .iter()
            .filter(|e| e.label == "Earning releases")
            .collect();
        assert_eq!(earnings[0].lower_window, 14);
        assert_eq!(earnings[0].upper_window, 28);
    }

    #[test]
    fn test_overlapping_sources_are_deduplicated() {
        let calendar = HolidayCalendarBuilder::new()
            .with_closures("Christmas Day", &[d(2024, 12, 25)])
            .with_closures("Christmas Day", &[d(2024, 12, 25)])
            .build()
            .unwrap();
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn test_asymmetric_window_columns() {
        let calendar = HolidayCalendarBuilder::new()
            .with_event("earnings", &[d(2024, 3, 10)], 2, 1)
            .build()
            .unwrap();
        let history = days(d(2024, 3, 1), 20);
        let features = HolidayFeatures::new(&calendar, 10.0, SeasonalityMode::Additive, &history);
        let offsets: Vec<i64> = features.columns().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![-2, -1, 0, 1]);

        assert_eq!(features.features(d(2024, 3, 7)), vec![0.0; 4]);
        assert_eq!(features.features(d(2024, 3, 8)), vec![1.0, 0.0, 0.0, 0.0]);
        assert_eq!(features.features(d(2024, 3, 11)), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(features.features(d(2024, 3, 12)), vec![0.0; 4]);
    }

    #[test]
    fn test_overlapping_labels_both_fire() {
        let calendar = HolidayCalendar::new(vec![
            HolidayEntry::new(d(2024, 11, 28), "Thanksgiving Day").with_window(0, 1),
            HolidayEntry::new(d(2024, 11, 29), "Day After Thanksgiving").with_prior_scale(1.0),
        ])
        .unwrap();
        let history = days(d(2024, 11, 1), 30);
        let features = HolidayFeatures::new(&calendar, 10.0, SeasonalityMode::Additive, &history);
        assert_eq!(features.width(), 3);
        let row = features.features(d(2024, 11, 29));
        assert_eq!(row.iter().sum::<f64>(), 2.0);
        let prior = features
            .columns()
            .iter()
            .find(|c| c.label == "Day After Thanksgiving")
            .unwrap()
            .prior_scale;
        assert_eq!(prior, 1.0);
    }

    #[test]
    fn test_columns_limited_to_history() {
        let calendar = HolidayCalendarBuilder::new()
            .with_closures("Independence Day", &[d(2024, 7, 4), d(2025, 7, 4)])
            .with_closures("Christmas Day", &[d(2025, 12, 25)])
            .build()
            .unwrap();
        let history = days(d(2024, 6, 1), 60);
        let features = HolidayFeatures::new(&calendar, 10.0, SeasonalityMode::Additive, &history);
        assert_eq!(features.width(), 1);
        // future occurrence of an observed label still fires
        assert_eq!(features.features(d(2025, 7, 4)), vec![1.0]);
        assert_eq!(features.features(d(2025, 12, 25)), vec![0.0]);
    }
}
