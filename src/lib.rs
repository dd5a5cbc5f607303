//! submission-stats: histogram and chart payloads for course submission statistics.
//!
//! The `core` module holds the pure binning, labelling, downsampling and
//! summary building blocks. The `api` module turns dashboard queries and
//! graded submissions into `{labels, series}` chart payloads.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ChartData, ChartKind, ChartQuery, DashboardConfig, build_report};
pub use error::{StatsError, StatsResult};
