use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    draw_category_labels, format_count, padded_range, render_png, CategoryChart, ChartError,
    ChartFile, FONT,
};
use crate::color::{plasma, viridis};
use crate::config::FigureSize;
use crate::data::aggregate::{group_by_month, group_by_year};
use crate::data::model::{TimeSeries, MONTH_ABBREVIATIONS};
use crate::stats::BoxStats;

/// Box width as a share of its category slot.
const BOX_WIDTH: f64 = 0.8;
const EDGE: RGBColor = RGBColor(61, 61, 61);

/// One category on a box panel.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    /// `None` when the category has no data; its slot stays empty.
    pub stats: Option<BoxStats>,
}

/// Year-wise groups, ascending.
pub fn year_groups(series: &TimeSeries) -> Vec<BoxGroup> {
    group_by_year(series)
        .into_iter()
        .map(|(year, values)| BoxGroup {
            label: year.to_string(),
            stats: BoxStats::from_values(&values),
        })
        .collect()
}

/// Month-wise groups, always twelve and always Jan → Dec.
pub fn month_groups(series: &TimeSeries) -> Vec<BoxGroup> {
    group_by_month(series)
        .iter()
        .zip(MONTH_ABBREVIATIONS)
        .map(|(values, abbr)| BoxGroup {
            label: abbr.to_string(),
            stats: BoxStats::from_values(values),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_boxes<DB: DrawingBackend>(
    chart: &mut CategoryChart<'_, DB>,
    groups: &[BoxGroup],
    colors: &[RGBColor],
) -> Result<(), ChartError> {
    let half = BOX_WIDTH / 2.0;

    for (i, (group, color)) in groups.iter().zip(colors).enumerate() {
        let Some(stats) = &group.stats else {
            continue;
        };
        let center = i as f64 + 0.5;
        let (left, right) = (center - half, center + half);
        let (cap_left, cap_right) = (center - half / 2.0, center + half / 2.0);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            EDGE.stroke_width(1),
        )))?;

        let lines = [
            vec![(left, stats.median), (right, stats.median)],
            vec![(center, stats.q1), (center, stats.whisker_low)],
            vec![(center, stats.q3), (center, stats.whisker_high)],
            vec![(cap_left, stats.whisker_low), (cap_right, stats.whisker_low)],
            vec![(cap_left, stats.whisker_high), (cap_right, stats.whisker_high)],
        ];
        chart.draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, EDGE.stroke_width(1))),
        )?;

        chart.draw_series(
            stats
                .fliers
                .iter()
                .map(|&v| Circle::new((center, v), 3, EDGE.stroke_width(1))),
        )?;
    }
    Ok(())
}

/// One box panel: title, axes, category labels and the boxes themselves.
pub fn draw_box_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    x_desc: &str,
    groups: &[BoxGroup],
    colors: &[RGBColor],
) -> Result<(), ChartError> {
    let (lo, hi) = groups
        .iter()
        .filter_map(|g| g.stats.as_ref().map(BoxStats::extent))
        .reduce(|(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)))
        .ok_or(ChartError::Empty("box panel needs at least one value"))?;
    let (y_lo, y_hi) = padded_range(lo, hi, 0.05);
    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..groups.len() as f64, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc(x_desc)
        .y_desc("Page Views")
        .y_label_formatter(&format_count)
        .axis_desc_style((FONT, 16))
        .label_style((FONT, 13))
        .draw()?;

    draw_category_labels(area, &chart, &labels, y_lo)?;
    draw_boxes(&mut chart, groups, colors)?;
    Ok(())
}

/// Year-wise (trend) and month-wise (seasonality) box plots side by side.
pub fn draw_box_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &TimeSeries,
) -> Result<(), ChartError> {
    let panels = root.split_evenly((1, 2));

    let years = year_groups(series);
    draw_box_panel(
        &panels[0],
        "Year-wise Box Plot (Trend)",
        "Year",
        &years,
        &viridis(years.len()),
    )?;

    let months = month_groups(series);
    draw_box_panel(
        &panels[1],
        "Month-wise Box Plot (Seasonality)",
        "Month",
        &months,
        &plasma(months.len()),
    )?;

    Ok(())
}

pub fn render_box_chart(
    series: &TimeSeries,
    path: &Path,
    size: FigureSize,
) -> Result<ChartFile, ChartError> {
    render_png(path, size, |root| draw_box_chart(root, series))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use tempfile::tempdir;

    use super::*;
    use crate::data::model::PageView;

    fn series_from(start: (i32, u32, u32), days: i64) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        TimeSeries::from_rows(
            (0..days)
                .rev()
                .map(|i| PageView::new(start + Duration::days(i), ((i * 31) % 97) as f64 * 40.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn months_are_ordered_jan_to_dec() {
        // August 2018 through early April 2019: no May data at all.
        let groups = month_groups(&series_from((2018, 8, 1), 250));
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, MONTH_ABBREVIATIONS.to_vec());
        assert!(groups[0].stats.is_some());
        assert!(groups[4].stats.is_none());
        assert!(groups[7].stats.is_some());
    }

    #[test]
    fn years_are_ascending() {
        let groups = year_groups(&series_from((2016, 11, 1), 500));
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["2016", "2017", "2018"]);
    }

    #[test]
    fn renders_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("box_plot.png");
        let file = render_box_chart(&series_from((2016, 5, 9), 700), &path, (2000, 700)).unwrap();
        assert_eq!((file.width, file.height), (2000, 700));
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (2000, 700));
    }

    #[test]
    fn empty_series_is_an_error() {
        let dir = tempdir().unwrap();
        let err = render_box_chart(&TimeSeries::default(), &dir.path().join("x.png"), (800, 400))
            .unwrap_err();
        assert!(matches!(err, ChartError::Empty(_)));
    }
}
