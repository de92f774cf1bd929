/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Pipeline:
/// ```text
///  netflix_titles.csv / uploaded .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  candidate paths or uploaded bytes → Table + profile
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  profile coercions, required-field drops → CleanReport
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec predicates → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  counts, describe, token frequencies, metrics
///   └───────────┘
/// ```
///
/// Every interaction re-runs filter → aggregate over the immutable base
/// table; nothing is cached across interactions.

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
