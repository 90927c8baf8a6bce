use std::collections::BTreeMap;

use super::model::TimeSeries;

// ---------------------------------------------------------------------------
// Year × month means (bar chart)
// ---------------------------------------------------------------------------

/// Mean value per (year, month), unstacked into one row of twelve
/// optional cells per year.  `None` marks a month with no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyMeans {
    rows: BTreeMap<i32, [Option<f64>; 12]>,
}

impl MonthlyMeans {
    pub fn from_series(series: &TimeSeries) -> Self {
        let mut sums: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
        for row in series.iter() {
            let cell = sums.entry((row.year(), row.month())).or_default();
            cell.0 += row.value;
            cell.1 += 1;
        }

        let mut rows: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();
        for ((year, month), (sum, count)) in sums {
            rows.entry(year).or_insert([None; 12])[(month - 1) as usize] =
                Some(sum / count as f64);
        }
        Self { rows }
    }

    /// Years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    /// Mean for a 1-based month.
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        let idx = month.checked_sub(1)? as usize;
        self.rows.get(&year)?.get(idx).copied().flatten()
    }

    /// `(year, [jan..dec])` rows in ascending year order.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Option<f64>; 12])> {
        self.rows.iter().map(|(y, cells)| (*y, cells))
    }

    pub fn max(&self) -> Option<f64> {
        self.rows
            .values()
            .flat_map(|cells| cells.iter().flatten())
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Value groups (box chart)
// ---------------------------------------------------------------------------

/// Values grouped by year, ascending.
pub fn group_by_year(series: &TimeSeries) -> BTreeMap<i32, Vec<f64>> {
    let mut groups: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for row in series.iter() {
        groups.entry(row.year()).or_default().push(row.value);
    }
    groups
}

/// Values grouped by calendar month across all years; index 0 is January.
pub fn group_by_month(series: &TimeSeries) -> [Vec<f64>; 12] {
    let mut groups: [Vec<f64>; 12] = Default::default();
    for row in series.iter() {
        groups[(row.month() - 1) as usize].push(row.value);
    }
    groups
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::PageView;

    fn row(y: i32, m: u32, d: u32, v: f64) -> PageView {
        PageView::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), v)
    }

    fn fixture() -> TimeSeries {
        TimeSeries::from_rows(vec![
            row(2017, 12, 3, 30.0),
            row(2016, 5, 9, 10.0),
            row(2016, 5, 10, 20.0),
            row(2016, 5, 11, 45.0),
            row(2017, 1, 1, 7.0),
            row(2017, 12, 1, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn monthly_mean_is_arithmetic_mean_of_group() {
        let means = MonthlyMeans::from_series(&fixture());
        assert_eq!(means.years().collect::<Vec<_>>(), vec![2016, 2017]);
        assert_eq!(means.get(2016, 5), Some((10.0 + 20.0 + 45.0) / 3.0));
        assert_eq!(means.get(2017, 12), Some(20.0));
        assert_eq!(means.get(2017, 1), Some(7.0));
        assert_eq!(means.get(2016, 6), None);
        assert_eq!(means.get(2016, 0), None);
        assert_eq!(means.max(), Some(25.0));
    }

    #[test]
    fn missing_months_stay_empty_in_unstacked_rows() {
        let means = MonthlyMeans::from_series(&fixture());
        let (year, cells) = means.rows().next().unwrap();
        assert_eq!(year, 2016);
        assert_eq!(cells.iter().filter(|c| c.is_some()).count(), 1);
        assert_eq!(cells[4], Some(25.0));
    }

    #[test]
    fn year_groups_are_ascending() {
        let groups = group_by_year(&fixture());
        let years: Vec<_> = groups.keys().copied().collect();
        assert_eq!(years, vec![2016, 2017]);
        assert_eq!(groups[&2016], vec![10.0, 20.0, 45.0]);
        assert_eq!(groups[&2017].len(), 3);
    }

    #[test]
    fn month_groups_follow_calendar_order() {
        let groups = group_by_month(&fixture());
        assert_eq!(groups[0], vec![7.0]);
        assert_eq!(groups[4], vec![10.0, 20.0, 45.0]);
        assert_eq!(groups[11], vec![10.0, 30.0]);
        assert!(groups[1].is_empty());
    }
}
