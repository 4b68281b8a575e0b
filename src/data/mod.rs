/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  file / dropped bytes / pasted data URL
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode → parse CSV → validate → RecordTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable  │  Vec<SalesRecord>, category index
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category filter + calendar resample → AggregatedTable
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
