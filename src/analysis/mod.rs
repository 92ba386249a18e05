//! Statistics over dispatch records.
//!
//! Pure, synchronous transformations: categorical counts, time buckets,
//! trends, per-entity rollups, composite scores and pre-aggregation
//! filtering. Nothing here performs I/O or keeps state.

pub mod aggregate;
pub mod filter;
pub mod rollup;
pub mod score;
pub mod trend;

pub use aggregate::*;
pub use filter::RecordFilter;
pub use rollup::{best_resolution, fastest, rollup_by_entity, rollup_by_team, rollup_by_vehicle};
pub use score::{completion_rate, efficiency_index, kpi_snapshot, operational_profile};
pub use trend::{compute_trend, weekly_trend};
