/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json      coordinate .csv
///        │                            │
///        ▼                            ▼
///   ┌──────────────────────────────────────┐
///   │  loader   parse files → DashboardData │
///   └──────────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  profession / age predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group + count → chart tables
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
