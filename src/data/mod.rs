/// Data layer: core types, loading, clipping and grouping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TimeSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  TimeSeries   │  Vec<PageView>, unique ascending dates
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  2.5% / 97.5% percentile clipping
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  year × month means, year / month groups
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
