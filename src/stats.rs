use crate::data::filter::{quantile_sorted, sorted_non_nan};

/// Whisker reach as a multiple of the inter-quartile range.
pub const WHISKER_IQR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Box statistics
// ---------------------------------------------------------------------------

/// Everything needed to draw one box: quartiles, whisker ends and the
/// points that fall outside the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value ≥ `q1 - 1.5·IQR`.
    pub whisker_low: f64,
    /// Largest value ≤ `q3 + 1.5·IQR`.
    pub whisker_high: f64,
    /// Values beyond the whiskers, ascending.
    pub fliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    /// `None` when there are no non-NaN values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_non_nan(values.iter().copied());
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;

        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        // Quartiles lie inside the fences, so both searches find a value.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            fliers,
            count: sorted.len(),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lowest and highest drawn point, fliers included.
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.fliers.first().map_or(self.whisker_low, |f| f.min(self.whisker_low));
        let hi = self.fliers.last().map_or(self.whisker_high, |f| f.max(self.whisker_high));
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_and_whiskers_without_fliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert!(stats.fliers.is_empty());
        assert_eq!(stats.count, 5);
        assert_eq!(stats.extent(), (1.0, 5.0));
    }

    #[test]
    fn points_beyond_fences_become_fliers() {
        // q1 = 2.5, q3 = 7.5, IQR = 5, fences = [-5, 15]
        let values = [100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, -20.0, 9.0];
        let stats = BoxStats::from_values(&values).unwrap();
        assert_eq!(stats.q1, 2.5);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q3, 7.5);
        assert_eq!(stats.iqr(), 5.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 9.0);
        assert_eq!(stats.fliers, vec![-20.0, 100.0]);
        assert_eq!(stats.extent(), (-20.0, 100.0));
    }

    #[test]
    fn single_value_collapses_the_box() {
        let stats = BoxStats::from_values(&[42.0]).unwrap();
        assert_eq!((stats.q1, stats.median, stats.q3), (42.0, 42.0, 42.0));
        assert_eq!((stats.whisker_low, stats.whisker_high), (42.0, 42.0));
    }

    #[test]
    fn no_values_no_box() {
        assert!(BoxStats::from_values(&[]).is_none());
        assert!(BoxStats::from_values(&[f64::NAN]).is_none());
    }
}
