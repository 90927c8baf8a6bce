use std::fmt;

use anyhow::{bail, Result};
use log::info;

use super::model::TimeSeries;

/// Lower quantile of the clipping window.
pub const LOWER_QUANTILE: f64 = 0.025;
/// Upper quantile of the clipping window.
pub const UPPER_QUANTILE: f64 = 0.975;

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Quantile of already-sorted values, linear interpolation between the two
/// closest ranks.  Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Non-NaN values, sorted ascending.
pub fn sorted_non_nan(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v
}

// ---------------------------------------------------------------------------
// Percentile clipping
// ---------------------------------------------------------------------------

/// Closed value interval `[lower, upper]` that survives clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ClipBounds {
    /// Bounds at quantiles `lower_q` / `upper_q` of the series' values.
    pub fn from_series(series: &TimeSeries, lower_q: f64, upper_q: f64) -> Result<Self> {
        let sorted = sorted_non_nan(series.values());
        match (
            quantile_sorted(&sorted, lower_q),
            quantile_sorted(&sorted, upper_q),
        ) {
            (Some(lower), Some(upper)) => Ok(Self { lower, upper }),
            _ => bail!("Cannot compute percentiles of an empty series"),
        }
    }

    /// NaN never passes.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl fmt::Display for ClipBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.lower, self.upper)
    }
}

/// Rows whose value lies inside `bounds`.
pub fn clip(series: &TimeSeries, bounds: &ClipBounds) -> TimeSeries {
    series.retain_where(|row| bounds.contains(row.value))
}

/// Clip with explicit quantiles; bounds come from the unfiltered series.
pub fn clip_quantiles(
    series: &TimeSeries,
    lower_q: f64,
    upper_q: f64,
) -> Result<(TimeSeries, ClipBounds)> {
    let bounds = ClipBounds::from_series(series, lower_q, upper_q)?;
    let clipped = clip(series, &bounds);
    info!(
        "Clipped to {bounds}: kept {} of {} rows",
        clipped.len(),
        series.len()
    );
    Ok((clipped, bounds))
}

/// Drop values outside the central 95% (2.5th to 97.5th percentile).
pub fn clip_outliers(series: &TimeSeries) -> Result<(TimeSeries, ClipBounds)> {
    clip_quantiles(series, LOWER_QUANTILE, UPPER_QUANTILE)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::data::model::PageView;

    fn series(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2016, 5, 9).unwrap();
        TimeSeries::from_rows(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| PageView::new(start + Duration::days(i as i64), v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 1.0), Some(10.0));
        assert_eq!(quantile_sorted(&v, 0.5), Some(5.5));
        let lo = quantile_sorted(&v, 0.025).unwrap();
        let hi = quantile_sorted(&v, 0.975).unwrap();
        assert!((lo - 1.225).abs() < 1e-12);
        assert!((hi - 9.775).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[3.0], 0.975), Some(3.0));
    }

    #[test]
    fn retained_values_lie_within_original_bounds() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 * 13.0).collect();
        let ts = series(&values);
        let (clipped, bounds) = clip_outliers(&ts).unwrap();

        let sorted = sorted_non_nan(ts.values());
        assert_eq!(bounds.lower, quantile_sorted(&sorted, 0.025).unwrap());
        assert_eq!(bounds.upper, quantile_sorted(&sorted, 0.975).unwrap());
        assert!(!clipped.is_empty());
        assert!(clipped.len() < ts.len());
        assert!(clipped.values().all(|v| bounds.lower <= v && v <= bounds.upper));
    }

    #[test]
    fn clipping_is_idempotent_with_same_bounds() {
        let ts = series(&[5.0, 1.0, 300.0, 7.0, 6.0, 8.0, -40.0, 9.0, 4.0, 5.5]);
        let (once, bounds) = clip_outliers(&ts).unwrap();
        let twice = clip(&once, &bounds);
        assert_eq!(once, twice);
    }

    #[test]
    fn extremes_are_dropped() {
        let ts = series(&[5.0, 1.0, 300.0, 7.0, 6.0, 8.0, 2.0, 9.0, 4.0, 5.5]);
        let (clipped, _) = clip_outliers(&ts).unwrap();
        let kept: Vec<f64> = clipped.values().collect();
        assert!(!kept.contains(&300.0));
        assert!(!kept.contains(&1.0));
        assert_eq!(kept.len(), 8);
    }

    #[test]
    fn nan_values_are_ignored_and_dropped() {
        let ts = series(&[1.0, f64::NAN, 2.0, 3.0]);
        let bounds = ClipBounds::from_series(&ts, 0.0, 1.0).unwrap();
        assert_eq!(bounds, ClipBounds { lower: 1.0, upper: 3.0 });
        let clipped = clip(&ts, &bounds);
        assert_eq!(clipped.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_series_has_no_bounds() {
        assert!(clip_outliers(&TimeSeries::default()).is_err());
        assert!(clip_outliers(&series(&[f64::NAN])).is_err());
    }
}
