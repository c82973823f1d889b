/// Data layer: core types, loading, filtering and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  DataSource: read once, hand out Arc<Dataset>
///   └──────────┘
///        │  loader: parse file → Dataset
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Employee>, column index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (indices)
///   └──────────┘
///        │
///        ▼
///   metrics / stats  (count, attrition rate, bins, quartiles, correlation)
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod stats;
