//! Metrics aggregation and trend classification for a sales-CRM dashboard.
//!
//! Every calculator is a pure function over already-fetched data. Callers
//! pass the evaluation instant (`now` / `today`) explicitly.

pub mod config;
pub mod date_util;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod payload;
pub mod range;
pub mod summary;
pub mod tasks;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportRequest, ReportType};
pub use metrics::{
    BreakdownSlice, Category, RankedPerformer, RateWarning, TeamStats, Tier, Trend,
};
pub use models::{
    ConversionCounts, DashboardPayload, PerformerRecord, TaskRecord,
};
pub use range::{DateRange, DateRangeToken, ResolvedRange};
pub use summary::{DashboardSummary, SummaryBuilder};
pub use tasks::TaskPartition;
