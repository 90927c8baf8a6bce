use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{draw_category_labels, format_count, render_png, ChartError, ChartFile, FONT};
use crate::color::{generate_palette, ColorMap};
use crate::config::FigureSize;
use crate::data::aggregate::MonthlyMeans;
use crate::data::model::{TimeSeries, MONTH_NAMES};

/// Share of each year slot covered by its twelve bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Bar chart (monthly means clustered by year)
// ---------------------------------------------------------------------------

/// Month number (1–12) → bar colour, legend in calendar order.
pub fn month_colors() -> ColorMap<u32> {
    ColorMap::new(1..=12, generate_palette(12))
}

/// Left edge and width of the bar for `month_idx` (0-based) in year slot `year_idx`.
fn bar_span(year_idx: usize, month_idx: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / 12.0;
    let left = year_idx as f64 + (1.0 - GROUP_WIDTH) / 2.0 + month_idx as f64 * width;
    (left, width)
}

/// Draw monthly means as bars clustered by year.  The legend opens with a
/// "Months" entry backed by an empty series and an invisible marker.
pub fn draw_bar_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    means: &MonthlyMeans,
) -> Result<(), ChartError> {
    if means.is_empty() {
        return Err(ChartError::Empty("bar chart needs at least one month"));
    }
    let years: Vec<String> = means.years().map(|y| y.to_string()).collect();
    let y_min = means
        .rows()
        .flat_map(|(_, cells)| cells.iter().flatten().copied())
        .fold(0.0f64, f64::min);
    let y_max = means.max().unwrap_or(1.0).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..years.len() as f64, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Years")
        .y_desc("Average Page Views")
        .y_label_formatter(&format_count)
        .axis_desc_style((FONT, 16))
        .label_style((FONT, 13))
        .draw()?;

    draw_category_labels(root, &chart, &years, y_min)?;

    // Legend title row
    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
        .label("Months")
        .legend(|(x, y)| EmptyElement::at((x, y)));

    let colors = month_colors();
    for (month_idx, name) in MONTH_NAMES.iter().enumerate() {
        let color = colors.color_for(&(month_idx as u32 + 1));
        let bars = means
            .rows()
            .enumerate()
            .filter_map(|(year_idx, (_, cells))| {
                let mean = cells[month_idx]?;
                let (left, width) = bar_span(year_idx, month_idx);
                Some(Rectangle::new([(left, 0.0), (left + width, mean)], color.filled()))
            });

        chart
            .draw_series(bars)?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 13))
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Group by (year, month), average, and render the clustered bar chart.
pub fn render_bar_chart(
    series: &TimeSeries,
    path: &Path,
    size: FigureSize,
) -> Result<ChartFile, ChartError> {
    let means = MonthlyMeans::from_series(series);
    render_png(path, size, |root| draw_bar_chart(root, &means))
}
