//! Pipeline orchestration
//!
//! This module provides the public API for Pulse. It runs the raw export text
//! through every stage and hands back one immutable result.

use crate::normalizer::Normalizer;
use crate::parser::parse_table;
use crate::scoring::Scorer;
use crate::source::LogSource;
use crate::trends::{calc_streak, rolling_avg, DEFAULT_ROLLING_WINDOW, DEFAULT_WARNING_WINDOW};
use crate::types::{DashboardSnapshot, ScoredEntry, WarningTotals};
use crate::{config::PulseConfig, error::PulseError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of one pipeline run.
///
/// An empty dashboard is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The export had no data rows
    NoData,
    /// Rows were parsed but none could be dated
    NoUsableRows { parsed_rows: usize },
    /// At least one dated row was scored
    Dashboard(DashboardSnapshot),
}

impl PipelineOutcome {
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            PipelineOutcome::Dashboard(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn into_snapshot(self) -> Option<DashboardSnapshot> {
        match self {
            PipelineOutcome::Dashboard(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Run an export through the pipeline with default windows.
///
/// # Example
/// ```
/// use betterme_pulse::{daily_log_to_dashboard, PipelineOutcome};
///
/// let csv = "Date,SleepHours\n2026-01-01,7.5\n";
/// match daily_log_to_dashboard(csv) {
///     PipelineOutcome::Dashboard(snapshot) => assert_eq!(snapshot.streak, 1),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub fn daily_log_to_dashboard(text: &str) -> PipelineOutcome {
    PulseProcessor::new().process(text)
}

/// Pipeline runner holding the aggregation windows.
///
/// Holds no state between runs; every call builds a fresh record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseProcessor {
    rolling_window: usize,
    warning_window: usize,
}

impl Default for PulseProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseProcessor {
    pub fn new() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW,
            warning_window: DEFAULT_WARNING_WINDOW,
        }
    }

    /// Create a processor with specific rolling-average and warning windows
    pub fn with_windows(rolling_window: usize, warning_window: usize) -> Self {
        Self {
            rolling_window: rolling_window.max(1),
            warning_window: warning_window.max(1),
        }
    }

    pub fn from_config(config: &PulseConfig) -> Self {
        Self::with_windows(config.rolling_window, config.warning_window)
    }

    /// Process raw export text.
    ///
    /// Pipeline stages:
    /// 1. Parser - split text into header-keyed rows
    /// 2. Normalizer - resolve dates, drop undateable rows, sort
    /// 3. Scorer - pillar scores and warning flags per entry
    /// 4. Trends - rolling average, streak, trailing warning totals
    pub fn process(&self, text: &str) -> PipelineOutcome {
        let table = parse_table(text);
        if table.is_empty() {
            return PipelineOutcome::NoData;
        }

        let entries = Normalizer::normalize(&table.rows);
        if entries.is_empty() {
            return PipelineOutcome::NoUsableRows {
                parsed_rows: table.rows.len(),
            };
        }

        let dropped = table.rows.len() - entries.len();
        if dropped > 0 {
            info!(dropped, "skipped rows without a usable date");
        }

        let scored: Vec<ScoredEntry> = entries.into_iter().map(Scorer::score).collect();
        PipelineOutcome::Dashboard(self.aggregate(scored))
    }

    /// Fetch from a source, then process.
    ///
    /// Fetch failures are returned as errors; empty exports are outcomes.
    pub fn process_source(
        &self,
        source: &dyn LogSource,
        config: &PulseConfig,
    ) -> Result<PipelineOutcome, PulseError> {
        let text = source.fetch(config.fetch_timeout).map_err(|e| {
            warn!(source = %source.describe(), error = %e, "export fetch failed");
            e
        })?;
        Ok(self.process(&text))
    }

    fn aggregate(&self, entries: Vec<ScoredEntry>) -> DashboardSnapshot {
        let totals: Vec<f64> = entries.iter().map(ScoredEntry::total).collect();
        let rolling_average = rolling_avg(&totals, self.rolling_window);
        let dates: Vec<&str> = entries.iter().map(ScoredEntry::date).collect();
        let streak = calc_streak(&dates);
        let warnings = WarningTotals::over_trailing(&entries, self.warning_window);

        info!(
            rows = entries.len(),
            last_entry = entries.last().map_or("", ScoredEntry::date),
            streak,
            "dashboard computed"
        );

        DashboardSnapshot {
            entries,
            rolling_average,
            rolling_window: self.rolling_window,
            streak,
            warnings,
            warning_window: self.warning_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn sample_log() -> &'static str {
        "Date,SleepHours,Steps,NoEscalationYN,NoImpulseYN\n\
         2026-01-02,5.5,3000,0,0\n\
         2026-01-01,7.5,8000,1,1\n"
    }

    #[test]
    fn test_end_to_end_scenario() {
        let outcome = daily_log_to_dashboard(sample_log());
        let snapshot = outcome.snapshot().expect("dashboard outcome");

        assert_eq!(snapshot.dates(), vec!["2026-01-01", "2026-01-02"]);

        let second = &snapshot.entries[1];
        assert_eq!(second.flags.low_sleep, 1);
        assert_eq!(second.flags.escalation, 1);
        assert_eq!(second.flags.impulse, 1);

        assert_eq!(
            snapshot.warnings,
            WarningTotals {
                low_sleep: 1,
                low_deep: 2,
                escalation: 1,
                impulse: 1,
            }
        );
        assert_eq!(snapshot.streak, 2);
        assert_eq!(snapshot.latest().map(ScoredEntry::date), Some("2026-01-02"));
    }

    #[test]
    fn test_end_to_end_scores() {
        let snapshot = daily_log_to_dashboard(sample_log()).into_snapshot().unwrap();

        // day 1: sleep 8 + steps 4; family 5; wealth 8
        assert_eq!(snapshot.entries[0].scores.health, 12.0);
        assert_eq!(snapshot.entries[0].scores.family, 5.0);
        assert_eq!(snapshot.entries[0].scores.wealth, 8.0);
        assert_eq!(snapshot.entries[0].scores.total, 25.0);
        // day 2: sleep 3 + steps 0
        assert_eq!(snapshot.entries[1].scores.total, 3.0);
        assert_eq!(snapshot.rolling_average, vec![25.0, 14.0]);
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert_eq!(daily_log_to_dashboard(""), PipelineOutcome::NoData);
        assert_eq!(daily_log_to_dashboard("Date,Steps\n"), PipelineOutcome::NoData);
    }

    #[test]
    fn test_undateable_rows_yield_no_usable_rows() {
        let outcome = daily_log_to_dashboard("Steps,SleepHours\n100,7\n200,8\n");
        assert_eq!(outcome, PipelineOutcome::NoUsableRows { parsed_rows: 2 });
        assert!(outcome.snapshot().is_none());
    }

    #[test]
    fn test_custom_windows() {
        let text = "Date,StrengthYN\n\
                    2026-01-01,1\n2026-01-02,0\n2026-01-03,1\n2026-01-05,1\n";
        let snapshot = PulseProcessor::with_windows(2, 2)
            .process(text)
            .into_snapshot()
            .unwrap();

        assert_eq!(snapshot.rolling_average, vec![4.0, 2.0, 2.0, 4.0]);
        assert_eq!(snapshot.streak, 1);
        assert_eq!(snapshot.warning_window, 2);
        assert_eq!(snapshot.warnings.low_sleep, 2);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(PipelineOutcome::NoUsableRows { parsed_rows: 3 }).unwrap();
        assert_eq!(json["status"], "no_usable_rows");
        assert_eq!(json["parsed_rows"], 3);
    }

    struct TimingOut;

    impl LogSource for TimingOut {
        fn fetch(&self, timeout: Duration) -> Result<String, FetchError> {
            Err(FetchError::Timeout { after: timeout })
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    struct Fixed(&'static str);

    impl LogSource for Fixed {
        fn fetch(&self, _timeout: Duration) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn test_process_source_surfaces_timeout() {
        let err = PulseProcessor::new()
            .process_source(&TimingOut, &PulseConfig::default())
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_process_source_runs_pipeline() {
        let outcome = PulseProcessor::new()
            .process_source(&Fixed(sample_log()), &PulseConfig::default())
            .unwrap();
        assert_eq!(outcome.snapshot().unwrap().entries.len(), 2);
    }
}
