//! US federal and NYSE holiday calendars and business-day generation.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use financial_spi::{FinancialError, Result};
use serde::{Deserialize, Serialize};

/// A named holiday on its observed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHoliday {
    pub date: NaiveDate,
    pub name: String,
}

impl MarketHoliday {
    fn new(date: NaiveDate, name: &str) -> Self {
        Self {
            date,
            name: name.to_string(),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        FinancialError::invalid("date", format!("{year}-{month:02}-{day:02} is not a valid date"))
    })
}

/// The `n`-th (1-based) `weekday` of a month.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Result<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n).ok_or_else(|| {
        FinancialError::invalid(
            "date",
            format!("no {weekday:?} number {n} in {year}-{month:02}"),
        )
    })
}

/// The last `weekday` of a month.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Result<NaiveDate> {
    let mut date = crate::returns::month_end(ymd(year, month, 1)?)?;
    while date.weekday() != weekday {
        date -= Duration::days(1);
    }
    Ok(date)
}

/// Saturday holidays move to Friday, Sunday holidays to Monday.
pub fn nearest_workday(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Western Easter Sunday (anonymous Gregorian computus).
pub fn easter_sunday(year: i32) -> Result<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// US federal holidays on their observed dates.
///
/// Fixed-date holidays falling on a weekend are observed on the nearest
/// weekday. Juneteenth is included from 2021.
pub fn us_federal_holidays(years: impl IntoIterator<Item = i32>) -> Result<Vec<MarketHoliday>> {
    let mut holidays = Vec::new();
    for year in years {
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 1, 1)?), "New Year's Day"));
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 1, Weekday::Mon, 3)?,
            "Martin Luther King Jr. Day",
        ));
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 2, Weekday::Mon, 3)?,
            "Washington's Birthday",
        ));
        holidays.push(MarketHoliday::new(last_weekday(year, 5, Weekday::Mon)?, "Memorial Day"));
        if year >= 2021 {
            holidays.push(MarketHoliday::new(
                nearest_workday(ymd(year, 6, 19)?),
                "Juneteenth National Independence Day",
            ));
        }
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 7, 4)?), "Independence Day"));
        holidays.push(MarketHoliday::new(nth_weekday(year, 9, Weekday::Mon, 1)?, "Labor Day"));
        holidays.push(MarketHoliday::new(nth_weekday(year, 10, Weekday::Mon, 2)?, "Columbus Day"));
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 11, 11)?), "Veterans Day"));
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 11, Weekday::Thu, 4)?,
            "Thanksgiving Day",
        ));
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 12, 25)?), "Christmas Day"));
    }
    holidays.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(holidays)
}

/// Full-day NYSE closures.
///
/// A New Year's Day falling on Saturday is not observed on the preceding
/// Friday.
pub fn nyse_holidays(years: impl IntoIterator<Item = i32>) -> Result<Vec<MarketHoliday>> {
    let mut holidays = Vec::new();
    for year in years {
        let new_year = ymd(year, 1, 1)?;
        if new_year.weekday() != Weekday::Sat {
            holidays.push(MarketHoliday::new(nearest_workday(new_year), "New Year's Day"));
        }
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 1, Weekday::Mon, 3)?,
            "Martin Luther King Jr. Day",
        ));
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 2, Weekday::Mon, 3)?,
            "Washington's Birthday",
        ));
        holidays.push(MarketHoliday::new(
            easter_sunday(year)? - Duration::days(2),
            "Good Friday",
        ));
        holidays.push(MarketHoliday::new(last_weekday(year, 5, Weekday::Mon)?, "Memorial Day"));
        if year >= 2022 {
            holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 6, 19)?), "Juneteenth"));
        }
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 7, 4)?), "Independence Day"));
        holidays.push(MarketHoliday::new(nth_weekday(year, 9, Weekday::Mon, 1)?, "Labor Day"));
        holidays.push(MarketHoliday::new(
            nth_weekday(year, 11, Weekday::Thu, 4)?,
            "Thanksgiving Day",
        ));
        holidays.push(MarketHoliday::new(nearest_workday(ymd(year, 12, 25)?), "Christmas Day"));
    }
    holidays.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(holidays)
}

/// NYSE early-close sessions: July 3, the day after Thanksgiving and
/// Christmas Eve, when those fall on a trading day.
pub fn nyse_early_closes(years: impl IntoIterator<Item = i32>) -> Result<Vec<MarketHoliday>> {
    let mut closes = Vec::new();
    for year in years {
        let closed: HashSet<NaiveDate> = nyse_holidays([year])?.into_iter().map(|h| h.date).collect();
        let candidates = [
            (ymd(year, 7, 3)?, "Independence Day Eve"),
            (
                nth_weekday(year, 11, Weekday::Thu, 4)? + Duration::days(1),
                "Day After Thanksgiving",
            ),
            (ymd(year, 12, 24)?, "Christmas Eve"),
        ];
        for (date, name) in candidates {
            if !is_weekend(date) && !closed.contains(&date) {
                closes.push(MarketHoliday::new(date, name));
            }
        }
    }
    Ok(closes)
}

/// Weekdays in `[start, end]` that are not in `holidays`.
pub fn business_days(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> Vec<NaiveDate> {
    let closed: HashSet<NaiveDate> = holidays.iter().copied().collect();
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !is_weekend(*d) && !closed.contains(d))
        .collect()
}

/// Business days in `[start, end]` under the US federal holiday calendar.
pub fn us_business_days(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    // observed New Year's Day of the following year can land on Dec 31
    let holidays: Vec<NaiveDate> = us_federal_holidays(start.year()..=end.year() + 1)?
        .into_iter()
        .map(|h| h.date)
        .collect();
    Ok(business_days(start, end, &holidays))
}
