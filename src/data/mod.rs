/// Data layer: core types, loading, filtering and derived statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MeasurementTable   (memoized by `cache`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ MeasurementTable │  Vec<Measurement>, distinct values, value bounds
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  department / category / value-range predicates → View
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌─────────┐   ┌──────────┐
///   │  stats   │   │ markers  │  aggregates, chart data, map markers
///   └─────────┘   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod markers;
pub mod model;
pub mod stats;
