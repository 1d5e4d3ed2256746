use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use thiserror::Error;

use crate::data::Bar;

const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Open", "High", "Low", "Close"];

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("input file contains no usable rows")]
    Empty,

    #[error("required column '{0}' not found in header (column names are case-sensitive)")]
    MissingColumn(&'static str),
}

/// Column offsets of the required fields within the header record.
struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|field| field.trim() == name)
                .ok_or(LoaderError::MissingColumn(name))
        };
        Ok(Self {
            date: find(REQUIRED_COLUMNS[0])?,
            open: find(REQUIRED_COLUMNS[1])?,
            high: find(REQUIRED_COLUMNS[2])?,
            low: find(REQUIRED_COLUMNS[3])?,
            close: find(REQUIRED_COLUMNS[4])?,
        })
    }
}

pub fn load_bars_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    read_bars(file)
}

/// Read, clean, and order OHLC bars from CSV data.
///
/// Rows with unparseable dates, missing/unparseable numerics (including the
/// literal `-` placeholder), or incoherent OHLC relationships are dropped
/// rather than treated as fatal. Surviving bars are sorted by date with
/// duplicate dates collapsed to their first occurrence.
pub fn read_bars<R: Read>(input: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(bar) = parse_record(&record, &columns) {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }

    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    Ok(bars)
}

fn parse_record(record: &StringRecord, columns: &ColumnMap) -> Option<Bar> {
    let date = parse_date(record.get(columns.date)?)?;
    let open = parse_number(record.get(columns.open)?)?;
    let high = parse_number(record.get(columns.high)?)?;
    let low = parse_number(record.get(columns.low)?)?;
    let close = parse_number(record.get(columns.close)?)?;

    let bar = Bar {
        date,
        open,
        high,
        low,
        close,
    };
    is_coherent(&bar).then_some(bar)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let patterns = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for pattern in &patterns {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Some(date);
        }
    }
    None
}

/// Parse one numeric field, normalizing thousands-separator commas and the
/// literal `-` missing-data placeholder.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok()
}

fn is_coherent(bar: &Bar) -> bool {
    let prices = [bar.open, bar.high, bar.low, bar.close];
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return false;
    }
    bar.low <= bar.open.min(bar.close) && bar.high >= bar.open.max(bar.close)
}

pub fn validate_series(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(anyhow!("no bars to analyze"));
    }
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(anyhow!("bar dates must be strictly increasing"));
        }
    }
    Ok(())
}
