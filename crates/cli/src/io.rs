//! CSV and JSON input/output.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use financial::{PricePoint, PriceSeries};
use forecast::{ForecastConfig, HolidayEntry};
use serde::{Deserialize, Serialize};

use crate::CliResult;

#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date", alias = "ds")]
    date: NaiveDate,
    #[serde(alias = "Close", alias = "close_price", alias = "price", alias = "y")]
    close: f64,
}

/// Event rows: `date,label[,lower_window,upper_window,prior_scale]`.
///
/// Window sizes are read as magnitudes, so `-14` and `14` both extend the
/// window 14 days before the date.
#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(alias = "ds")]
    date: NaiveDate,
    #[serde(alias = "holiday")]
    label: String,
    #[serde(default)]
    lower_window: Option<i64>,
    #[serde(default)]
    upper_window: Option<i64>,
    #[serde(default)]
    prior_scale: Option<f64>,
}

fn open(path: &Path) -> CliResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))
}

/// Read `date,close` rows in any order.
pub fn read_prices<R: Read>(reader: R) -> CliResult<PriceSeries> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut points = Vec::new();
    for (line, record) in reader.deserialize::<PriceRecord>().enumerate() {
        let record = record.map_err(|e| format!("Failed to read price row {}: {}", line + 1, e))?;
        points.push(PricePoint::new(record.date, record.close));
    }
    if points.is_empty() {
        return Err("No price rows found".to_string());
    }
    PriceSeries::from_unordered(points).map_err(|e| e.to_string())
}

pub fn load_prices(path: &Path) -> CliResult<PriceSeries> {
    let prices = read_prices(open(path)?)?;
    tracing::info!(
        path = %path.display(),
        rows = prices.len(),
        "loaded prices"
    );
    Ok(prices)
}

pub fn read_events<R: Read>(reader: R) -> CliResult<Vec<HolidayEntry>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for (line, record) in reader.deserialize::<EventRecord>().enumerate() {
        let record = record.map_err(|e| format!("Failed to read event row {}: {}", line + 1, e))?;
        let window = |w: Option<i64>| -> CliResult<u32> {
            u32::try_from(w.unwrap_or(0).unsigned_abs())
                .map_err(|_| format!("Event window too large on row {}", line + 1))
        };
        let mut entry = HolidayEntry::new(record.date, record.label)
            .with_window(window(record.lower_window)?, window(record.upper_window)?);
        entry.prior_scale = record.prior_scale;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn load_events(path: &Path) -> CliResult<Vec<HolidayEntry>> {
    let entries = read_events(open(path)?)?;
    tracing::info!(path = %path.display(), events = entries.len(), "loaded events");
    Ok(entries)
}

pub fn load_forecast_config(path: &Path) -> CliResult<ForecastConfig> {
    serde_json::from_reader(open(path)?)
        .map_err(|e| format!("Failed to parse forecast config {}: {}", path.display(), e))
}

/// Write pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> CliResult<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            serde_json::to_writer_pretty(file, value)
                .map_err(|e| format!("Failed to write JSON: {}", e))?;
            tracing::info!(path = %path.display(), "results written");
        }
        None => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}
