use anyhow::{Context, Result};
use log::info;

use crate::config::PlotConfig;
use crate::data::filter::{clip_quantiles, ClipBounds};
use crate::data::loader::load_file;
use crate::data::model::TimeSeries;
use crate::render::bar::render_bar_chart;
use crate::render::boxplot::render_box_chart;
use crate::render::line::render_line_chart;
use crate::render::ChartFile;

// ---------------------------------------------------------------------------
// Pipeline: load → clip → render
// ---------------------------------------------------------------------------

/// What one run produced.
#[derive(Debug, Clone)]
pub struct Report {
    pub rows_loaded: usize,
    pub bounds: ClipBounds,
    /// The clipped series every chart was drawn from.
    pub series: TimeSeries,
    pub line: ChartFile,
    pub bar: ChartFile,
    pub boxes: ChartFile,
}

impl Report {
    pub fn rows_dropped(&self) -> usize {
        self.rows_loaded - self.series.len()
    }

    pub fn files(&self) -> [&ChartFile; 3] {
        [&self.line, &self.bar, &self.boxes]
    }
}

/// Load, clip and render all three charts.
pub fn run(config: &PlotConfig) -> Result<Report> {
    let raw = load_file(&config.input)?;
    let (series, bounds) = clip_quantiles(&raw, config.lower_quantile, config.upper_quantile)
        .context("clipping outliers")?;

    let line = render_line_chart(&series, &config.line_path(), config.line_size)
        .context("drawing line plot")?;
    let bar = render_bar_chart(&series, &config.bar_path(), config.bar_size)
        .context("drawing bar plot")?;
    let boxes = render_box_chart(&series, &config.box_path(), config.box_size)
        .context("drawing box plot")?;

    let report = Report {
        rows_loaded: raw.len(),
        bounds,
        series,
        line,
        bar,
        boxes,
    };
    info!(
        "Done: {} rows plotted, {} dropped as outliers",
        report.series.len(),
        report.rows_dropped()
    );
    Ok(report)
}
