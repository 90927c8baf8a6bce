/// Chart rendering: three independent renderers drawing onto any plotters
/// backend, plus the PNG plumbing they share.
///
/// Every renderer takes the clipped series by shared reference and never
/// mutates it, so they can run in any order.
pub mod bar;
pub mod boxplot;
pub mod line;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::info;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontStyle};
use thiserror::Error;

use crate::config::FigureSize;

/// Font family used for every piece of text.
pub const FONT: &str = "sans-serif";

const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static FONTS: OnceLock<Result<(), String>> = OnceLock::new();

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("font registration failed: {0}")]
    Font(String),

    #[error("nothing to plot: {0}")]
    Empty(&'static str),

    #[error("pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// PNG output
// ---------------------------------------------------------------------------

/// One image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Register the embedded font under [`FONT`].  Runs once per process.
pub fn ensure_fonts() -> Result<(), ChartError> {
    FONTS
        .get_or_init(|| {
            register_font(FONT, FontStyle::Normal, DEJAVU_SANS)
                .map_err(|_| format!("embedded font for '{FONT}' is not valid TrueType"))
        })
        .clone()
        .map_err(ChartError::Font)
}

/// Draw onto a white RGB canvas of `size` and save it as PNG at `path`.
pub fn render_png<F>(path: &Path, size: FigureSize, draw: F) -> Result<ChartFile, ChartError>
where
    F: for<'a, 'b> FnOnce(&'a DrawingArea<BitMapBackend<'b>, Shift>) -> Result<(), ChartError>,
{
    ensure_fonts()?;

    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    image::RgbImage::from_raw(width, height, buffer)
        .ok_or(ChartError::Buffer(width, height))?
        .save_with_format(path, image::ImageFormat::Png)?;

    info!("Wrote {} ({width}x{height})", path.display());
    Ok(ChartFile {
        path: path.to_path_buf(),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Chart whose x axis holds categories: category `i` spans `[i, i + 1)`.
pub type CategoryChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// `[lo, hi]` widened by `pad` of its span on both ends; never degenerate.
pub fn padded_range(lo: f64, hi: f64, pad: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let margin = if lo.abs() > 1.0 { lo.abs() * 0.05 } else { 1.0 };
        return (lo - margin, hi + margin);
    }
    (lo - span * pad, hi + span * pad)
}

/// Tick label without decimals.
pub fn format_count(v: &f64) -> String {
    format!("{v:.0}")
}

/// Write one label centred under each category slot.
///
/// The mesh labels of a numeric axis do not line up with slot centres, so
/// category names are placed by hand in the x label area.
pub fn draw_category_labels<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &CategoryChart<'_, DB>,
    labels: &[String],
    baseline: f64,
) -> Result<(), ChartError> {
    let (base_x, base_y) = area.get_base_pixel();
    let style = (FONT, 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    for (i, label) in labels.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, baseline));
        area.draw(&Text::new(
            label.as_str(),
            (x - base_x, y - base_y + 6),
            style.clone(),
        ))?;
    }
    Ok(())
}
