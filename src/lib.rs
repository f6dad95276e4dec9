//! BetterMe Pulse - Daily-log scoring pipeline
//!
//! Pulse turns a loosely formatted sheet export into a four-pillar wellbeing
//! dashboard through a deterministic pipeline: tabular parsing → value
//! coercion and date normalization → pillar scoring → trend aggregation.
//!
//! ## Modules
//!
//! - **Core pipeline**: [`parser`], [`coercion`], [`normalizer`], [`scoring`], [`trends`]
//! - **Orchestration**: [`pipeline`] produces an immutable [`DashboardSnapshot`]
//! - **Edges**: [`source`] fetches the raw export, [`encoder`] renders reports

pub mod coercion;
pub mod config;
pub mod encoder;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod scoring;
pub mod source;
pub mod trends;
pub mod types;

#[cfg(feature = "cli")]
pub mod telemetry;

pub use config::PulseConfig;
pub use error::PulseError;
pub use pipeline::{daily_log_to_dashboard, PipelineOutcome, PulseProcessor};
pub use source::{FetchError, LogSource};
pub use types::{DailyEntry, DashboardSnapshot, ScoredEntry};

/// Pulse version embedded in every JSON report
pub const PULSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for JSON reports
pub const PRODUCER_NAME: &str = "betterme-pulse";
