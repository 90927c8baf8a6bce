use std::fmt;

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Calendar labels
// ---------------------------------------------------------------------------

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Abbreviated month names, Jan first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Abbreviated name for a 1-based month number.
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    MONTH_ABBREVIATIONS.get(month.checked_sub(1)? as usize).copied()
}

// ---------------------------------------------------------------------------
// PageView – one row of the input table
// ---------------------------------------------------------------------------

/// A single daily observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView {
    pub date: NaiveDate,
    pub value: f64,
}

impl PageView {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, 1–12.
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.value)
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – the complete loaded table
// ---------------------------------------------------------------------------

/// Rows keyed by date: unique and ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    rows: Vec<PageView>,
}

impl TimeSeries {
    /// Sort rows by date and reject duplicate dates.
    pub fn from_rows(mut rows: Vec<PageView>) -> Result<Self> {
        rows.sort_by_key(|r| r.date);
        if let Some(pair) = rows.windows(2).find(|w| w[0].date == w[1].date) {
            bail!("Duplicate date {} in time series", pair[0].date);
        }
        Ok(Self { rows })
    }

    /// Keep the rows matching `keep`. Order and uniqueness carry over.
    pub fn retain_where<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&PageView) -> bool,
    {
        Self {
            rows: self.rows.iter().copied().filter(|r| keep(r)).collect(),
        }
    }

    pub fn rows(&self) -> &[PageView] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageView> {
        self.rows.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.value)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Smallest and largest finite value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rows_are_sorted_by_date() {
        let ts = TimeSeries::from_rows(vec![
            PageView::new(day(2017, 3, 2), 2.0),
            PageView::new(day(2016, 5, 9), 1.0),
            PageView::new(day(2017, 1, 1), 3.0),
        ])
        .unwrap();
        let dates: Vec<_> = ts.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2016, 5, 9), day(2017, 1, 1), day(2017, 3, 2)]);
        assert_eq!(ts.first_date(), Some(day(2016, 5, 9)));
        assert_eq!(ts.last_date(), Some(day(2017, 3, 2)));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let err = TimeSeries::from_rows(vec![
            PageView::new(day(2018, 1, 1), 1.0),
            PageView::new(day(2018, 1, 1), 2.0),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("2018-01-01"));
    }

    #[test]
    fn value_range_skips_nan() {
        let ts = TimeSeries::from_rows(vec![
            PageView::new(day(2018, 1, 1), 4.0),
            PageView::new(day(2018, 1, 2), f64::NAN),
            PageView::new(day(2018, 1, 3), -2.0),
        ])
        .unwrap();
        assert_eq!(ts.value_range(), Some((-2.0, 4.0)));
        assert_eq!(TimeSeries::default().value_range(), None);
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_abbreviation(9), Some("Sep"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_abbreviation(13), None);
    }
}
