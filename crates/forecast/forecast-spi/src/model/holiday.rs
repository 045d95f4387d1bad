//! Holiday calendar model

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ForecastError, Result};

/// A labelled date whose effect extends over a window of days.
///
/// The entry is active on `[date - lower_window, date + upper_window]`.
/// Signed windows (`"lower_window": -14`) deserialize by magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub label: String,
    #[serde(default, deserialize_with = "window_days")]
    pub lower_window: u32,
    #[serde(default, deserialize_with = "window_days")]
    pub upper_window: u32,
    /// Overrides the model-wide holiday prior scale for this label.
    #[serde(default)]
    pub prior_scale: Option<f64>,
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
            lower_window: 0,
            upper_window: 0,
            prior_scale: None,
        }
    }

    pub fn with_window(mut self, lower_window: u32, upper_window: u32) -> Self {
        self.lower_window = lower_window;
        self.upper_window = upper_window;
        self
    }

    pub fn with_prior_scale(mut self, prior_scale: f64) -> Self {
        self.prior_scale = Some(prior_scale);
        self
    }

    /// Day offsets relative to `date` covered by the window.
    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        -(self.lower_window as i64)..=self.upper_window as i64
    }

    /// Dates covered by the window, paired with their offset.
    ///
    /// Offsets past the representable date range are skipped; calendars
    /// reject such entries up front.
    pub fn active_dates(&self) -> impl Iterator<Item = (i64, NaiveDate)> + '_ {
        self.offsets().filter_map(move |offset| {
            self.date
                .checked_add_signed(Duration::days(offset))
                .map(|date| (offset, date))
        })
    }

    /// First and last active dates.
    pub fn window_bounds(&self) -> Result<(NaiveDate, NaiveDate)> {
        let shift = |days: i64| {
            self.date.checked_add_signed(Duration::days(days)).ok_or_else(|| {
                ForecastError::invalid(
                    "holidays",
                    format!(
                        "window of '{}' on {} leaves the supported date range",
                        self.label, self.date
                    ),
                )
            })
        };
        Ok((
            shift(-(self.lower_window as i64))?,
            shift(self.upper_window as i64)?,
        ))
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        let offset = (date - self.date).num_days();
        offset >= -(self.lower_window as i64) && offset <= self.upper_window as i64
    }
}

fn window_days<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let days = i64::deserialize(deserializer)?;
    u32::try_from(days.unsigned_abs())
        .map_err(|_| serde::de::Error::custom(format!("window of {days} days is too large")))
}

/// A validated, date-sorted set of holiday entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<HolidayEntry>", into = "Vec<HolidayEntry>")]
pub struct HolidayCalendar {
    entries: Vec<HolidayEntry>,
}

impl HolidayCalendar {
    /// Validate and sort entries by date, then label.
    ///
    /// Exact duplicates are dropped. Labels must be non-empty, prior scales
    /// positive, and every entry of a label must agree on its prior scale.
    pub fn new(mut entries: Vec<HolidayEntry>) -> Result<Self> {
        for entry in &entries {
            if entry.label.trim().is_empty() {
                return Err(ForecastError::invalid(
                    "holidays",
                    format!("entry on {} has an empty label", entry.date),
                ));
            }
            entry.window_bounds()?;
            if let Some(scale) = entry.prior_scale {
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(ForecastError::invalid(
                        "holidays",
                        format!("prior scale for '{}' must be positive", entry.label),
                    ));
                }
            }
        }
        for (i, a) in entries.iter().enumerate() {
            if let Some(b) = entries[i + 1..]
                .iter()
                .find(|b| b.label == a.label && b.prior_scale != a.prior_scale)
            {
                return Err(ForecastError::invalid(
                    "holidays",
                    format!(
                        "label '{}' has conflicting prior scales ({:?} and {:?})",
                        a.label, a.prior_scale, b.prior_scale
                    ),
                ));
            }
        }

        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.label.cmp(&b.label)));
        entries.dedup();
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HolidayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels in sorted order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.label.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Union with another calendar.
    pub fn merge(&self, other: &HolidayCalendar) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        Self::new(entries)
    }

    /// Entries active on `date`.
    pub fn active_on(&self, date: NaiveDate) -> impl Iterator<Item = &HolidayEntry> {
        self.entries.iter().filter(move |e| e.is_active_on(date))
    }
}

impl TryFrom<Vec<HolidayEntry>> for HolidayCalendar {
    type Error = ForecastError;

    fn try_from(entries: Vec<HolidayEntry>) -> Result<Self> {
        HolidayCalendar::new(entries)
    }
}

impl From<HolidayCalendar> for Vec<HolidayEntry> {
    fn from(calendar: HolidayCalendar) -> Self {
        calendar.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_asymmetric_window() {
        let entry = HolidayEntry::new(d(2024, 5, 20), "earnings").with_window(14, 28);
        assert!(entry.is_active_on(d(2024, 5, 6)));
        assert!(!entry.is_active_on(d(2024, 5, 5)));
        assert!(entry.is_active_on(d(2024, 6, 17)));
        assert!(!entry.is_active_on(d(2024, 6, 18)));
        assert_eq!(entry.offsets().count(), 43);
    }

    #[test]
    fn test_calendar_sorted_and_deduped() {
        let calendar = HolidayCalendar::new(vec![
            HolidayEntry::new(d(2024, 12, 25), "Christmas Day"),
            HolidayEntry::new(d(2024, 7, 4), "Independence Day"),
            HolidayEntry::new(d(2024, 12, 25), "Christmas Day"),
        ])
        .unwrap();
        assert_eq!(calendar.len(), 2);
        assert_eq!(calendar.entries()[0].label, "Independence Day");
        assert_eq!(calendar.labels(), vec!["Christmas Day", "Independence Day"]);
    }

    #[test]
    fn test_rejects_empty_label() {
        let result = HolidayCalendar::new(vec![HolidayEntry::new(d(2024, 1, 1), " ")]);
        assert!(matches!(
            result,
            Err(ForecastError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rejects_conflicting_prior_scales() {
        let result = HolidayCalendar::new(vec![
            HolidayEntry::new(d(2024, 1, 1), "event").with_prior_scale(1.0),
            HolidayEntry::new(d(2024, 2, 1), "event").with_prior_scale(2.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_active_on_overlapping_labels() {
        let calendar = HolidayCalendar::new(vec![
            HolidayEntry::new(d(2024, 11, 28), "Thanksgiving Day").with_window(0, 1),
            HolidayEntry::new(d(2024, 11, 29), "Day After Thanksgiving"),
        ])
        .unwrap();
        assert_eq!(calendar.active_on(d(2024, 11, 29)).count(), 2);
        assert_eq!(calendar.active_on(d(2024, 11, 30)).count(), 0);
    }

    #[test]
    fn test_deserialize_with_default_windows() {
        let json = r#"[{"date":"2024-05-20","label":"earnings","upper_window":3}]"#;
        let calendar: HolidayCalendar = serde_json::from_str(json).unwrap();
        assert_eq!(calendar.entries()[0].lower_window, 0);
        assert_eq!(calendar.entries()[0].upper_window, 3);
        assert_eq!(calendar.entries()[0].prior_scale, None);
    }

    #[test]
    fn test_deserialize_signed_windows() {
        let json = r#"[{"date":"2024-05-20","label":"earnings","lower_window":-14,"upper_window":28}]"#;
        let calendar: HolidayCalendar = serde_json::from_str(json).unwrap();
        let entry = &calendar.entries()[0];
        assert_eq!((entry.lower_window, entry.upper_window), (14, 28));
        assert!(entry.is_active_on(d(2024, 5, 6)));

        let too_wide = r#"[{"date":"2024-05-20","label":"x","upper_window":99999999999}]"#;
        assert!(serde_json::from_str::<HolidayCalendar>(too_wide).is_err());
    }

    #[test]
    fn test_rejects_window_outside_date_range() {
        let entry = HolidayEntry::new(d(2024, 1, 1), "forever").with_window(0, u32::MAX);
        assert!(entry.window_bounds().is_err());
        assert!(matches!(
            HolidayCalendar::new(vec![entry]),
            Err(ForecastError::InvalidConfiguration { .. })
        ));

        let entry = HolidayEntry::new(NaiveDate::MAX, "edge").with_window(1, 2);
        assert_eq!(entry.active_dates().count(), 2);
        assert!(entry.window_bounds().is_err());
    }
}
