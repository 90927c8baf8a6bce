//! Daily forum page views: load, clip outliers at the 2.5th / 97.5th
//! percentiles, and render line, bar and box charts to PNG.

pub mod color;
pub mod config;
pub mod data;
pub mod render;
pub mod report;
pub mod stats;
