use std::path::Path;

use chrono::Duration;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{format_count, padded_range, render_png, ChartError, ChartFile, FONT};
use crate::config::FigureSize;
use crate::data::model::TimeSeries;

pub const TITLE: &str = "Daily freeCodeCamp Forum Page Views 5/2016-12/2019";

// ---------------------------------------------------------------------------
// Line chart (value over time)
// ---------------------------------------------------------------------------

/// Draw the daily series as one connected red line.
///
/// The x axis counts days from the first date so the coordinate stays a
/// plain integer range; tick labels map back to `YYYY-MM`.
pub fn draw_line_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &TimeSeries,
) -> Result<(), ChartError> {
    let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
        return Err(ChartError::Empty("line chart needs at least one row"));
    };
    let (lo, hi) = series
        .value_range()
        .ok_or(ChartError::Empty("line chart needs a finite value"))?;
    let (y_lo, y_hi) = padded_range(lo, hi, 0.05);
    let span = (last - first).num_days().max(1);

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, (FONT, 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0i64..span, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Page Views")
        .x_labels(10)
        .x_label_formatter(&|d| (first + Duration::days(*d)).format("%Y-%m").to_string())
        .y_label_formatter(&format_count)
        .axis_desc_style((FONT, 16))
        .label_style((FONT, 13))
        .draw()?;

    let points = series
        .iter()
        .filter(|r| r.value.is_finite())
        .map(|r| ((r.date - first).num_days(), r.value));
    chart.draw_series(LineSeries::new(points, RED.stroke_width(1)))?;

    Ok(())
}

/// Render the line chart to a PNG file.
pub fn render_line_chart(
    series: &TimeSeries,
    path: &Path,
    size: FigureSize,
) -> Result<ChartFile, ChartError> {
    render_png(path, size, |root| draw_line_chart(root, series))
}
