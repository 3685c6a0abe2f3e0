/// Data layer: source readers, merge, composite index and row selection.
///
/// Architecture:
/// ```text
///  data/*.csv                     merged .csv / .parquet
///        │                                │
///        ▼                                │
///   ┌──────────┐                          │
///   │ sources   │  typed readers, wide → long melt
///   └──────────┘                          │
///        │                                │
///        ▼                                │
///   ┌──────────┐                          │
///   │  merge    │  left joins on (country, year)
///   └──────────┘                          │
///        │                                │
///        ▼                                ▼
///   ┌──────────┐                   ┌──────────┐
///   │ composite │ ◄──────────────── │  loader   │
///   └──────────┘                   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MentalHealthTable │  Vec<CountryYear>
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  per-chart row selection
///   └──────────┘
/// ```

pub mod composite;
pub mod error;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod sources;
