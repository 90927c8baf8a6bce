use std::path::{Path, PathBuf};

use crate::data::filter::{LOWER_QUANTILE, UPPER_QUANTILE};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Pixel size of one output image.
pub type FigureSize = (u32, u32);

/// Where to read from, where to write to, and how big each chart is.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,

    pub lower_quantile: f64,
    pub upper_quantile: f64,

    pub line_file: String,
    pub bar_file: String,
    pub box_file: String,

    pub line_size: FigureSize,
    pub bar_size: FigureSize,
    pub box_size: FigureSize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("fcc-forum-pageviews.csv"),
            output_dir: PathBuf::from("."),
            lower_quantile: LOWER_QUANTILE,
            upper_quantile: UPPER_QUANTILE,
            line_file: "line_plot.png".to_string(),
            bar_file: "bar_plot.png".to_string(),
            box_file: "box_plot.png".to_string(),
            // 10×5, 8×7 and 20×7 inches at 100 dpi
            line_size: (1000, 500),
            bar_size: (800, 700),
            box_size: (2000, 700),
        }
    }
}

impl PlotConfig {
    /// Defaults, reading `input` and writing into `output_dir`.
    pub fn with_paths(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn line_path(&self) -> PathBuf {
        self.output_dir.join(&self.line_file)
    }

    pub fn bar_path(&self) -> PathBuf {
        self.output_dir.join(&self.bar_file)
    }

    pub fn box_path(&self) -> PathBuf {
        self.output_dir.join(&self.box_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_into_working_directory() {
        let cfg = PlotConfig::default();
        assert_eq!(cfg.input, PathBuf::from("fcc-forum-pageviews.csv"));
        assert_eq!(cfg.line_path(), PathBuf::from("./line_plot.png"));
        assert_eq!(cfg.bar_path(), PathBuf::from("./bar_plot.png"));
        assert_eq!(cfg.box_path(), PathBuf::from("./box_plot.png"));
        assert_eq!((cfg.lower_quantile, cfg.upper_quantile), (0.025, 0.975));
    }

    #[test]
    fn with_paths_keeps_other_defaults() {
        let cfg = PlotConfig::with_paths("/data/views.json", "/tmp/out");
        assert_eq!(cfg.input, PathBuf::from("/data/views.json"));
        assert_eq!(cfg.box_path(), PathBuf::from("/tmp/out/box_plot.png"));
        assert_eq!(cfg.box_size, (2000, 700));
    }
}
