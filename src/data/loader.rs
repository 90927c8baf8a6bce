use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{PageView, TimeSeries};

pub const DATE_COLUMN: &str = "date";
pub const VALUE_COLUMN: &str = "value";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a page-view time series from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header with `date` and `value` columns (others ignored)
/// * `.json`    – `[{ "date": "2016-05-09", "value": 1201 }, ...]`
/// * `.parquet` – `date` (string, date or timestamp) and `value` (numeric) columns
pub fn load_file(path: &Path) -> Result<TimeSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    let series = TimeSeries::from_rows(rows)?;
    info!(
        "Loaded {} rows from {} ({} .. {})",
        series.len(),
        path.display(),
        series.first_date().map(|d| d.to_string()).unwrap_or_default(),
        series.last_date().map(|d| d.to_string()).unwrap_or_default(),
    );
    Ok(series)
}

/// Parse a calendar date.  Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`
/// and RFC 3339 timestamps; the time of day is dropped.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    bail!("'{s}' is not a date")
}

/// Empty cells become NaN so the clipping step drops them.
fn parse_value(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least `date` and `value`, one row per day.
fn load_csv(path: &Path) -> Result<Vec<PageView>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .context("CSV missing 'date' column")?;
    let value_idx = headers
        .iter()
        .position(|h| h == VALUE_COLUMN)
        .context("CSV missing 'value' column")?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let date = parse_date(record.get(date_idx).unwrap_or(""))
            .with_context(|| format!("CSV row {row_no}, '{DATE_COLUMN}'"))?;
        let value = parse_value(record.get(value_idx).unwrap_or(""))
            .with_context(|| format!("CSV row {row_no}, '{VALUE_COLUMN}'"))?;

        rows.push(PageView::new(date, value));
    }

    debug!("CSV: {} records, columns {:?}", rows.len(), headers);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One element of the records-oriented array (`df.to_json(orient='records')`).
#[derive(Debug, Deserialize)]
struct JsonRecord {
    date: String,
    value: f64,
}

fn load_json(path: &Path) -> Result<Vec<PageView>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<JsonRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            let date = parse_date(&rec.date).with_context(|| format!("Row {i}"))?;
            Ok(PageView::new(date, rec.value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a `date` and a `value` column.
///
/// `date` may be Utf8, Date32, Date64 or any Timestamp unit; `value` may be
/// any 32/64-bit integer or float.  Null values become NaN.
fn load_parquet(path: &Path) -> Result<Vec<PageView>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let date_idx = schema
            .index_of(DATE_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'date' column"))?;
        let value_idx = schema
            .index_of(VALUE_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'value' column"))?;

        let date_col = batch.column(date_idx);
        let value_col = batch.column(value_idx);

        for row in 0..batch.num_rows() {
            let date = extract_date(date_col, row)
                .with_context(|| format!("Row {row}: failed to read 'date'"))?;
            let value = extract_value(value_col, row)
                .with_context(|| format!("Row {row}: failed to read 'value'"))?;
            rows.push(PageView::new(date, value));
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn extract_date(col: &ArrayRef, row: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!("null date");
    }
    let date = match col.data_type() {
        DataType::Utf8 => return parse_date(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => return parse_date(col.as_string::<i64>().value(row)),
        DataType::Date32 => col.as_primitive::<Date32Type>().value_as_date(row),
        DataType::Date64 => col.as_primitive::<Date64Type>().value_as_date(row),
        DataType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => col
                .as_primitive::<TimestampSecondType>()
                .value_as_datetime(row),
            TimeUnit::Millisecond => col
                .as_primitive::<TimestampMillisecondType>()
                .value_as_datetime(row),
            TimeUnit::Microsecond => col
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row),
            TimeUnit::Nanosecond => col
                .as_primitive::<TimestampNanosecondType>()
                .value_as_datetime(row),
        }
        .map(|dt| dt.date()),
        other => bail!("Expected a string, date or timestamp column, got {other:?}"),
    };
    date.context("date out of range")
}

fn extract_value(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        return Ok(f64::NAN);
    }
    let value = match col.data_type() {
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(value)
}
